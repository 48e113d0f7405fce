use crate::config::StatArbParams;
use crate::data::MarketSeries;
use crate::engine::{self, Evaluation, RunStatus, StateMachine};
use crate::error::{EvalError, SignalError};
use crate::instrument::{ContractSpec, SyntheticContract};
use crate::portfolio::PositionSizer;
use crate::signal::{align, rolling_correlation, spread};
use crate::strategy::{observations, unanchored, Divergence, StrategyKind};
use tracing::{debug, info, trace, warn};

//relative value on one primary instrument, using a second one only as reference
//entries follow the spread divergence rules of the pairs strategy but need the two legs'
//return correlation to reach `min_correlation`; the primary leg is what gets traded
#[derive(Debug, Clone)]
pub struct StatArbEvaluator {
    params: StatArbParams,
}

impl StatArbEvaluator {
    pub fn new(params: StatArbParams) -> Result<Self, EvalError> {
        params.validate()?;
        Ok(StatArbEvaluator { params })
    }

    pub fn params(&self) -> &StatArbParams {
        &self.params
    }

    pub fn evaluate(
        &self,
        primary: &ContractSpec,
        reference: &ContractSpec,
        primary_series: &MarketSeries,
        reference_series: &MarketSeries,
    ) -> Result<Evaluation, EvalError> {
        let name = StrategyKind::StatArb.name();
        let base = &self.params.base;
        primary.validate()?;
        reference.validate()?;
        let sizer = PositionSizer::for_contract(base.risk_dollars, base.loss_ticks, primary)?;

        let mut report = primary.clone();
        report.display_name = format!("{} using {}", primary.shortcode, reference.shortcode);

        let (aligned_1, aligned_2) = align(primary_series, reference_series);
        let required = base.required_bars();
        let (Some(first_1), Some(first_2)) = (aligned_1.first(), aligned_2.first()) else {
            return Ok(self.insufficient(report, 0, required));
        };
        if aligned_1.len() < required {
            return Ok(self.insufficient(report, aligned_1.len(), required));
        }
        if let Some(date) = unanchored(first_1, first_2) {
            return Ok(self.skipped(report, RunStatus::UnanchoredSpread { date }));
        }

        let synthetic = SyntheticContract::build(
            primary,
            reference,
            self.params.spread,
            first_1.close,
            first_2.close,
        )?;

        let closes_1 = aligned_1.closes();
        let closes_2 = aligned_2.closes();
        let spread_values = spread(&closes_1, &closes_2, synthetic.kind, synthetic.hedge_ratio)?;
        let correlations = rolling_correlation(&closes_1, &closes_2, base.ma_lookback_days);

        let min_correlation = self.params.min_correlation;
        let mut blocked = 0usize;
        let gate = |i: usize| match correlations[i] {
            Ok(rho) if rho >= min_correlation => true,
            Ok(rho) => {
                trace!(date = %aligned_1[i].date, rho, "correlation gate closed");
                blocked += 1;
                false
            }
            Err(SignalError::Degenerate) => {
                trace!(date = %aligned_1[i].date, "correlation undefined, gate closed");
                blocked += 1;
                false
            }
            Err(_) => false,
        };

        //stops and fills use the primary leg's own bars
        let observations =
            observations(aligned_1.bars(), &spread_values, base.ma_lookback_days, gate);

        let rules = Divergence {
            net_change: base.net_change,
        };
        let machine = StateMachine::new(&rules, &primary.shortcode, primary.point_value, sizer);
        let ledger = engine::run(&machine, &observations)?;

        debug!(
            strategy = name,
            instrument = %report.display_name,
            blocked_bars = blocked,
            "correlation gate summary"
        );
        info!(
            strategy = name,
            instrument = %report.display_name,
            bars = aligned_1.len(),
            quantity = sizer.quantity(),
            trades = ledger.len(),
            pnl = ledger.total_pnl(),
            "run complete"
        );

        Ok(Evaluation::completed(name, report, None, ledger))
    }

    fn insufficient(&self, report: ContractSpec, available: usize, required: usize) -> Evaluation {
        self.skipped(
            report,
            RunStatus::InsufficientHistory {
                available,
                required,
            },
        )
    }

    fn skipped(&self, report: ContractSpec, status: RunStatus) -> Evaluation {
        warn!(
            strategy = StrategyKind::StatArb.name(),
            instrument = %report.display_name,
            ?status,
            "run skipped"
        );
        Evaluation::skipped(StrategyKind::StatArb.name(), report, status)
    }
}
