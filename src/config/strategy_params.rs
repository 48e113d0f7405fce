use crate::error::EvalError;
use crate::instrument::SpreadKind;
use serde::{Deserialize, Serialize};

//parameters shared by every strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    //distance from the moving average, in price units, that triggers an entry
    pub net_change: f64,
    pub ma_lookback_days: usize,
    //stop distance in ticks of the traded instrument
    pub loss_ticks: f64,
    //dollars risked per trade
    pub risk_dollars: f64,
}

impl StrategyParams {
    pub fn new(net_change: f64, ma_lookback_days: usize, loss_ticks: f64, risk_dollars: f64) -> Self {
        StrategyParams {
            net_change,
            ma_lookback_days,
            loss_ticks,
            risk_dollars,
        }
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        if !(self.loss_ticks.is_finite() && self.loss_ticks > 0.0) {
            return Err(EvalError::ZeroStopDistance {
                stop_ticks: self.loss_ticks,
            });
        }
        if !(self.net_change.is_finite() && self.net_change >= 0.0) {
            return Err(EvalError::invalid(
                "net_change",
                format!("must be a non-negative price distance, got {}", self.net_change),
            ));
        }
        if self.ma_lookback_days < 2 {
            return Err(EvalError::invalid(
                "ma_lookback_days",
                format!("must be at least 2, got {}", self.ma_lookback_days),
            ));
        }
        if !(self.risk_dollars.is_finite() && self.risk_dollars > 0.0) {
            return Err(EvalError::invalid(
                "risk_dollars",
                format!("must be positive, got {}", self.risk_dollars),
            ));
        }
        Ok(())
    }

    //bars a run needs: a full window plus one more bar to act on
    pub fn required_bars(&self) -> usize {
        self.ma_lookback_days + 1
    }
}

//pairs reversion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairsParams {
    #[serde(flatten)]
    pub base: StrategyParams,
    #[serde(default)]
    pub spread: SpreadKind,
}

impl PairsParams {
    pub fn new(base: StrategyParams) -> Self {
        PairsParams {
            base,
            spread: SpreadKind::default(),
        }
    }

    pub fn with_spread(mut self, spread: SpreadKind) -> Self {
        self.spread = spread;
        self
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        self.base.validate()
    }
}

//stat-arb parameters, adds the correlation gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatArbParams {
    #[serde(flatten)]
    pub base: StrategyParams,
    pub min_correlation: f64,
    #[serde(default)]
    pub spread: SpreadKind,
}

impl StatArbParams {
    pub fn new(base: StrategyParams, min_correlation: f64) -> Self {
        StatArbParams {
            base,
            min_correlation,
            spread: SpreadKind::default(),
        }
    }

    pub fn with_spread(mut self, spread: SpreadKind) -> Self {
        self.spread = spread;
        self
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        self.base.validate()?;
        if !(-1.0..=1.0).contains(&self.min_correlation) {
            return Err(EvalError::invalid(
                "min_correlation",
                format!("must lie in [-1, 1], got {}", self.min_correlation),
            ));
        }
        //a return correlation needs at least two returns in the window
        if self.base.ma_lookback_days < 3 {
            return Err(EvalError::invalid(
                "ma_lookback_days",
                format!("stat-arb needs at least 3, got {}", self.base.ma_lookback_days),
            ));
        }
        Ok(())
    }
}

//trend following defaults: get in early, small frequent losses
impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams::new(0.25, 40, 0.1, 1000.0)
    }
}

//divergence defaults: wait until blown out, larger infrequent losses
impl Default for PairsParams {
    fn default() -> Self {
        PairsParams::new(StrategyParams::new(0.75, 40, 0.2, 1000.0))
    }
}

impl Default for StatArbParams {
    fn default() -> Self {
        StatArbParams::new(StrategyParams::new(0.75, 40, 0.2, 1000.0), 0.65)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(StrategyParams::default().validate().is_ok());
        assert!(PairsParams::default().validate().is_ok());
        assert!(StatArbParams::default().validate().is_ok());
    }

    #[test]
    fn zero_loss_ticks_is_zero_stop_distance() {
        let params = StrategyParams::new(0.25, 40, 0.0, 1000.0);
        assert_eq!(
            params.validate(),
            Err(EvalError::ZeroStopDistance { stop_ticks: 0.0 })
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(StrategyParams::new(-1.0, 40, 0.1, 1000.0).validate().is_err());
        assert!(StrategyParams::new(0.25, 1, 0.1, 1000.0).validate().is_err());
        assert!(StrategyParams::new(0.25, 40, 0.1, 0.0).validate().is_err());
        assert!(StatArbParams::new(StrategyParams::default(), 1.5).validate().is_err());
        assert!(StatArbParams::new(StrategyParams::new(0.25, 2, 0.1, 1000.0), 0.5)
            .validate()
            .is_err());
    }

    #[test]
    fn stat_arb_params_from_flat_json() {
        let json = r#"{"net_change":0.75,"ma_lookback_days":40,"loss_ticks":0.2,
                      "risk_dollars":1000,"min_correlation":0.65,"spread":"ratio"}"#;
        let params: StatArbParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.base.ma_lookback_days, 40);
        assert_eq!(params.spread, SpreadKind::Ratio);
    }
}
