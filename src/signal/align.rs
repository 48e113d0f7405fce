use crate::data::MarketSeries;
use std::cmp::Ordering;
use tracing::debug;

//inner join of two series on date, unmatched dates are dropped
pub fn align(series_1: &MarketSeries, series_2: &MarketSeries) -> (MarketSeries, MarketSeries) {
    let (bars_1, bars_2) = (series_1.bars(), series_2.bars());
    let mut kept_1 = Vec::with_capacity(bars_1.len().min(bars_2.len()));
    let mut kept_2 = Vec::with_capacity(kept_1.capacity());

    //both sides are sorted by date, so a merge walk is enough
    let (mut i, mut j) = (0, 0);
    while i < bars_1.len() && j < bars_2.len() {
        match bars_1[i].date.cmp(&bars_2[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                kept_1.push(bars_1[i]);
                kept_2.push(bars_2[j]);
                i += 1;
                j += 1;
            }
        }
    }

    let dropped = bars_1.len() + bars_2.len() - 2 * kept_1.len();
    if dropped > 0 {
        debug!(
            leg_1 = series_1.shortcode(),
            leg_2 = series_2.shortcode(),
            dropped,
            shared = kept_1.len(),
            "calendar mismatch reconciled"
        );
    }

    (
        MarketSeries::new(series_1.shortcode(), kept_1),
        MarketSeries::new(series_2.shortcode(), kept_2),
    )
}
