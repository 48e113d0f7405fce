use crate::config::PairsParams;
use crate::data::{Bar, MarketSeries};
use crate::engine::{self, Evaluation, RunStatus, StateMachine};
use crate::error::EvalError;
use crate::instrument::{ContractSpec, SyntheticContract};
use crate::portfolio::PositionSizer;
use crate::signal::{align, spread};
use crate::strategy::{observations, unanchored, Divergence, StrategyKind};
use tracing::{info, warn};

//two instrument mean reversion on a synthetic spread
//sells the spread when it stretches `net_change` above its moving average, buys it when stretched below
//trades, sizing and pnl are all at the synthetic instrument level
#[derive(Debug, Clone)]
pub struct PairsReversionEvaluator {
    params: PairsParams,
}

impl PairsReversionEvaluator {
    pub fn new(params: PairsParams) -> Result<Self, EvalError> {
        params.validate()?;
        Ok(PairsReversionEvaluator { params })
    }

    pub fn params(&self) -> &PairsParams {
        &self.params
    }

    pub fn evaluate(
        &self,
        leg_1: &ContractSpec,
        leg_2: &ContractSpec,
        series_1: &MarketSeries,
        series_2: &MarketSeries,
    ) -> Result<Evaluation, EvalError> {
        let name = StrategyKind::PairsReversion.name();
        let base = &self.params.base;
        leg_1.validate()?;
        leg_2.validate()?;

        let (aligned_1, aligned_2) = align(series_1, series_2);
        let required = base.required_bars();
        let (Some(first_1), Some(first_2)) = (aligned_1.first(), aligned_2.first()) else {
            return Ok(self.insufficient(leg_1, leg_2, 0, required));
        };
        if aligned_1.len() < required {
            return Ok(self.insufficient(leg_1, leg_2, aligned_1.len(), required));
        }
        if let Some(date) = unanchored(first_1, first_2) {
            return Ok(self.skipped(leg_1, leg_2, RunStatus::UnanchoredSpread { date }));
        }

        let synthetic = SyntheticContract::build(
            leg_1,
            leg_2,
            self.params.spread,
            first_1.close,
            first_2.close,
        )?;
        let sizer = PositionSizer::for_contract(base.risk_dollars, base.loss_ticks, &synthetic.spec)?;

        let spread_values = spread(
            &aligned_1.closes(),
            &aligned_2.closes(),
            synthetic.kind,
            synthetic.hedge_ratio,
        )?;

        //the spread only has a close, so the stop is checked against it
        let spread_bars: Vec<Bar> = aligned_1
            .iter()
            .zip(&spread_values)
            .map(|(bar, &value)| Bar::from_close(bar.date, value))
            .collect();

        let observations =
            observations(&spread_bars, &spread_values, base.ma_lookback_days, |_| true);

        let rules = Divergence {
            net_change: base.net_change,
        };
        let machine = StateMachine::new(&rules, synthetic.name(), synthetic.spec.point_value, sizer);
        let ledger = engine::run(&machine, &observations)?;

        info!(
            strategy = name,
            instrument = synthetic.name(),
            hedge_ratio = synthetic.hedge_ratio,
            bars = spread_bars.len(),
            quantity = sizer.quantity(),
            trades = ledger.len(),
            pnl = ledger.total_pnl(),
            "run complete"
        );

        Ok(Evaluation::completed(
            name,
            synthetic.spec.clone(),
            Some(synthetic),
            ledger,
        ))
    }

    fn insufficient(
        &self,
        leg_1: &ContractSpec,
        leg_2: &ContractSpec,
        available: usize,
        required: usize,
    ) -> Evaluation {
        self.skipped(
            leg_1,
            leg_2,
            RunStatus::InsufficientHistory {
                available,
                required,
            },
        )
    }

    fn skipped(&self, leg_1: &ContractSpec, leg_2: &ContractSpec, status: RunStatus) -> Evaluation {
        let label = ContractSpec::new(
            format!("{}-{}", leg_1.shortcode, leg_2.shortcode),
            format!("{} vs {}", leg_1.display_name, leg_2.display_name),
            leg_1.tick_size,
            leg_1.point_value,
        );
        warn!(
            strategy = StrategyKind::PairsReversion.name(),
            instrument = %label.shortcode,
            ?status,
            "run skipped"
        );
        Evaluation::skipped(StrategyKind::PairsReversion.name(), label, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyParams;
    use crate::portfolio::{Direction, ExitReason};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn series(shortcode: &str, closes: &[f64]) -> MarketSeries {
        let points: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (day(i as u32 + 1), c))
            .collect();
        MarketSeries::from_closes(shortcode, &points)
    }

    fn legs() -> (ContractSpec, ContractSpec) {
        (
            ContractSpec::new("AA", "leg one", 0.5, 10.0),
            ContractSpec::new("BB", "leg two", 0.25, 20.0),
        )
    }

    //4 ticks of 0.5 is a 2.0 stop, $20 of risk per contract, 5 contracts for $100
    fn evaluator() -> PairsReversionEvaluator {
        PairsReversionEvaluator::new(PairsParams::new(StrategyParams::new(2.0, 3, 4.0, 100.0)))
            .unwrap()
    }

    #[test]
    fn sells_a_stretched_spread_and_exits_on_reversion() {
        let (a, b) = legs();
        //leg two is flat, so the spread is leg one minus 100
        let s1 = series("AA", &[100.0, 100.0, 100.0, 103.0, 101.0, 100.0]);
        let s2 = series("BB", &[50.0; 6]);
        let evaluation = evaluator().evaluate(&a, &b, &s1, &s2).unwrap();

        let synthetic = evaluation.synthetic.as_ref().unwrap();
        assert_eq!(synthetic.name(), "AA-BB");
        assert_eq!(synthetic.hedge_ratio, 2.0);
        assert_eq!(evaluation.label(), "AA-BB");

        let ledger = evaluation.ledger().unwrap();
        assert_eq!(ledger.len(), 1);
        let trade = &ledger.trades()[0];
        assert_eq!(trade.instrument_label, "AA-BB");
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.entry_price, 3.0);
        assert_eq!(trade.exit_price, 1.0);
        assert_eq!(trade.exit_reason, ExitReason::Signal);
        assert_eq!(trade.quantity, 5);
        assert_eq!(trade.pnl, 100.0);
    }

    #[test]
    fn buys_a_depressed_spread_and_stops_out() {
        let (a, b) = legs();
        let s1 = series("AA", &[100.0, 100.0, 100.0, 97.0, 94.0, 94.0]);
        let s2 = series("BB", &[50.0; 6]);
        let evaluation = evaluator().evaluate(&a, &b, &s1, &s2).unwrap();
        let trade = &evaluation.ledger().unwrap().trades()[0];

        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.entry_price, -3.0);
        assert_eq!(trade.exit_reason, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, -5.0);
        assert_eq!(trade.pnl, -100.0);
    }

    #[test]
    fn mismatched_calendars_are_joined() {
        let (a, b) = legs();
        let s1 = series("AA", &[100.0, 100.0, 100.0, 103.0, 101.0, 100.0]);
        //leg two has an extra date leg one lacks and is missing day 2
        let mut points: Vec<_> = (1..=6).filter(|&d| d != 2).map(|d| (day(d), 50.0)).collect();
        points.push((day(9), 50.0));
        let s2 = MarketSeries::from_closes("BB", &points);

        let evaluation = evaluator().evaluate(&a, &b, &s1, &s2).unwrap();
        assert!(evaluation.is_success());
    }

    #[test]
    fn disjoint_calendars_are_insufficient() {
        let (a, b) = legs();
        let s1 = series("AA", &[100.0; 5]);
        let s2 = MarketSeries::from_closes("BB", &[(day(20), 50.0)]);
        let evaluation = evaluator().evaluate(&a, &b, &s1, &s2).unwrap();
        assert_eq!(
            evaluation.status,
            RunStatus::InsufficientHistory {
                available: 0,
                required: 4
            }
        );
        assert!(evaluation.ledger().is_none());
        assert_eq!(evaluation.label(), "AA-BB");
    }

    #[test]
    fn zero_first_close_skips_the_run() {
        let (a, b) = legs();
        let s1 = series("AA", &[100.0, 100.0, 100.0, 103.0, 101.0, 100.0]);
        let s2 = series("BB", &[0.0, 50.0, 50.0, 50.0, 50.0, 50.0]);
        let evaluation = evaluator().evaluate(&a, &b, &s1, &s2).unwrap();

        assert_eq!(evaluation.status, RunStatus::UnanchoredSpread { date: day(1) });
        assert!(evaluation.ledger().is_none());
        assert!(evaluation.synthetic.is_none());
        assert_eq!(evaluation.label(), "AA-BB");
    }
}
