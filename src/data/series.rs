use crate::data::bar::Bar;
use chrono::NaiveDate;
use std::ops::Index;
use tracing::warn;

//ordered daily bars of a single instrument
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSeries {
    shortcode: String,
    bars: Vec<Bar>,
}

impl MarketSeries {
    //builds a series, sorting by date and dropping repeated dates (first one wins)
    pub fn new(shortcode: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        let shortcode = shortcode.into();
        bars.sort_by_key(|bar| bar.date);

        let before = bars.len();
        bars.dedup_by_key(|bar| bar.date);
        if bars.len() != before {
            warn!(
                shortcode = %shortcode,
                dropped = before - bars.len(),
                "duplicate dates dropped from series"
            );
        }

        MarketSeries { shortcode, bars }
    }

    //builds a series from (date, close) pairs
    pub fn from_closes(shortcode: impl Into<String>, closes: &[(NaiveDate, f64)]) -> Self {
        let bars = closes
            .iter()
            .map(|&(date, close)| Bar::from_close(date, close))
            .collect();
        Self::new(shortcode, bars)
    }

    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    //index of the bar on the given date
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |bar| bar.date).ok()
    }

    //bar on the given date
    pub fn on(&self, date: NaiveDate) -> Option<&Bar> {
        self.position_of(date).map(|index| &self.bars[index])
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|bar| bar.date).collect()
    }
}

impl Index<usize> for MarketSeries {
    type Output = Bar;

    fn index(&self, index: usize) -> &Bar {
        &self.bars[index]
    }
}

impl<'a> IntoIterator for &'a MarketSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn sorts_and_dedups() {
        let series = MarketSeries::from_closes(
            "ES",
            &[(day(3), 3.0), (day(1), 1.0), (day(2), 2.0), (day(1), 9.0)],
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn lookup_by_date() {
        let series = MarketSeries::from_closes("ES", &[(day(2), 2.0), (day(5), 5.0)]);
        assert_eq!(series.position_of(day(5)), Some(1));
        assert_eq!(series.on(day(2)).map(|b| b.close), Some(2.0));
        assert!(series.on(day(3)).is_none());
        assert_eq!(series[1].date, day(5));
    }
}
