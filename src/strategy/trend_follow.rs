use crate::config::StrategyParams;
use crate::data::MarketSeries;
use crate::engine::{self, Evaluation, Rules, SignalPoint, StateMachine};
use crate::error::EvalError;
use crate::instrument::ContractSpec;
use crate::portfolio::{Direction, PositionSizer};
use crate::strategy::{observations, StrategyKind};
use tracing::{info, warn};

//single instrument breakout strategy
//goes long when the close breaks `net_change` above its moving average after sitting below it
//goes short on the mirror image, and exits on the stop or when the close recrosses the average
#[derive(Debug, Clone)]
pub struct TrendFollowEvaluator {
    params: StrategyParams,
}

impl TrendFollowEvaluator {
    pub fn new(params: StrategyParams) -> Result<Self, EvalError> {
        params.validate()?;
        Ok(TrendFollowEvaluator { params })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn evaluate(
        &self,
        contract: &ContractSpec,
        series: &MarketSeries,
    ) -> Result<Evaluation, EvalError> {
        let name = StrategyKind::TrendFollow.name();
        contract.validate()?;
        let sizer =
            PositionSizer::for_contract(self.params.risk_dollars, self.params.loss_ticks, contract)?;

        let required = self.params.required_bars();
        if series.len() < required {
            warn!(
                strategy = name,
                instrument = %contract.shortcode,
                available = series.len(),
                required,
                "insufficient history, run skipped"
            );
            return Ok(Evaluation::insufficient_history(
                name,
                contract.clone(),
                series.len(),
                required,
            ));
        }

        let closes = series.closes();
        let observations =
            observations(series.bars(), &closes, self.params.ma_lookback_days, |_| true);

        let machine = StateMachine::new(self, &contract.shortcode, contract.point_value, sizer);
        let ledger = engine::run(&machine, &observations)?;

        info!(
            strategy = name,
            instrument = %contract.shortcode,
            bars = series.len(),
            quantity = sizer.quantity(),
            trades = ledger.len(),
            pnl = ledger.total_pnl(),
            "run complete"
        );

        Ok(Evaluation::completed(name, contract.clone(), None, ledger))
    }
}

impl Rules for TrendFollowEvaluator {
    fn entry(&self, current: SignalPoint, previous: Option<SignalPoint>) -> Option<Direction> {
        let previous = previous?;
        if current.deviation() >= self.params.net_change && previous.value < previous.average {
            Some(Direction::Long)
        } else if current.deviation() <= -self.params.net_change
            && previous.value > previous.average
        {
            Some(Direction::Short)
        } else {
            None
        }
    }

    fn signal_exit(&self, direction: Direction, current: SignalPoint) -> bool {
        match direction {
            Direction::Long => current.value < current.average,
            Direction::Short => current.value > current.average,
        }
    }
}
