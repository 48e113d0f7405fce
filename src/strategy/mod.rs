pub mod pairs_reversion;
pub mod stat_arb;
pub mod trend_follow;

pub use pairs_reversion::PairsReversionEvaluator;
pub use stat_arb::StatArbEvaluator;
pub use trend_follow::TrendFollowEvaluator;

use crate::data::Bar;
use crate::engine::{Observation, Rules, SignalPoint};
use crate::portfolio::Direction;
use crate::signal::rolling_sma;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TrendFollow,
    PairsReversion,
    StatArb,
}

impl StrategyKind {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "trend" | "trend_follow" | "trend_following" => Some(StrategyKind::TrendFollow),
            "pairs" | "pairs_reversion" | "pairs_trading" => Some(StrategyKind::PairsReversion),
            "stat_arb" | "statarb" => Some(StrategyKind::StatArb),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::TrendFollow => "trend_follow",
            StrategyKind::PairsReversion => "pairs_reversion",
            StrategyKind::StatArb => "stat_arb",
        }
    }
}

//fade a spread that strays `net_change` from its average, exit once it crosses back
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Divergence {
    pub net_change: f64,
}

impl Rules for Divergence {
    fn entry(&self, current: SignalPoint, _previous: Option<SignalPoint>) -> Option<Direction> {
        if current.deviation() >= self.net_change {
            Some(Direction::Short)
        } else if current.deviation() <= -self.net_change {
            Some(Direction::Long)
        } else {
            None
        }
    }

    fn signal_exit(&self, direction: Direction, current: SignalPoint) -> bool {
        match direction {
            Direction::Short => current.value <= current.average,
            Direction::Long => current.value >= current.average,
        }
    }
}

//date of the first shared bar when either leg cannot anchor a hedge ratio there
pub(crate) fn unanchored(first_1: &Bar, first_2: &Bar) -> Option<NaiveDate> {
    let anchors = |price: f64| price.is_finite() && price > 0.0;
    (!(anchors(first_1.close) && anchors(first_2.close))).then_some(first_1.date)
}

//pairs each traded bar with the signal and its moving average on that bar
//`admissible` is asked once per bar index
pub(crate) fn observations(
    bars: &[Bar],
    signal: &[f64],
    lookback: usize,
    mut admissible: impl FnMut(usize) -> bool,
) -> Vec<Observation> {
    let points: Vec<Option<SignalPoint>> = rolling_sma(signal, lookback)
        .into_iter()
        .zip(signal)
        .map(|(average, &value)| average.map(|average| SignalPoint::new(value, average)))
        .collect();

    bars.iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (bar, &point))| Observation {
            date: bar.date,
            close: bar.close,
            signal: point,
            previous: i.checked_sub(1).and_then(|prev| points[prev]),
            admissible: admissible(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_strategy_names() {
        assert_eq!(StrategyKind::parse("Trend"), Some(StrategyKind::TrendFollow));
        assert_eq!(StrategyKind::parse("stat-arb"), Some(StrategyKind::StatArb));
        assert_eq!(StrategyKind::parse("pairs"), Some(StrategyKind::PairsReversion));
        assert_eq!(StrategyKind::parse("mean_reversion"), None);
    }

    #[test]
    fn divergence_fades_the_move() {
        let rules = Divergence { net_change: 1.0 };
        assert_eq!(rules.entry(SignalPoint::new(12.0, 11.0), None), Some(Direction::Short));
        assert_eq!(rules.entry(SignalPoint::new(9.5, 11.0), None), Some(Direction::Long));
        assert_eq!(rules.entry(SignalPoint::new(11.5, 11.0), None), None);
        assert!(rules.signal_exit(Direction::Short, SignalPoint::new(10.0, 10.5)));
        assert!(!rules.signal_exit(Direction::Long, SignalPoint::new(10.0, 10.5)));
    }

    #[test]
    fn hedge_anchor_needs_positive_closes() {
        let day = NaiveDate::from_ymd_opt(2020, 4, 20).unwrap();
        let good = Bar::from_close(day, 20.0);
        assert_eq!(unanchored(&good, &good), None);
        assert_eq!(unanchored(&good, &Bar::from_close(day, 0.0)), Some(day));
        assert_eq!(unanchored(&Bar::from_close(day, -37.63), &good), Some(day));
    }

    #[test]
    fn observations_carry_previous_point() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 8, d).unwrap();
        let bars: Vec<Bar> = (1..=4).map(|d| Bar::from_close(day(d), d as f64)).collect();
        let signal: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let obs = observations(&bars, &signal, 2, |i| i != 3);

        assert!(obs[0].signal.is_none());
        assert_eq!(obs[1].signal, Some(SignalPoint::new(2.0, 1.5)));
        assert!(obs[1].previous.is_none());
        assert_eq!(obs[2].previous, Some(SignalPoint::new(2.0, 1.5)));
        assert!(!obs[3].admissible);
    }
}
