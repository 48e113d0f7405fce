use crate::error::EvalError;
use serde::{Deserialize, Serialize};

//static per-instrument metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    //contract shortcode (eg es, nq, cl)
    pub shortcode: String,

    //human readable name, used only for labelling
    pub display_name: String,

    //minimum price fluctuation
    pub tick_size: f64,

    //dollar value of one full point move
    pub point_value: f64,
}

impl ContractSpec {
    pub fn new(
        shortcode: impl Into<String>,
        display_name: impl Into<String>,
        tick_size: f64,
        point_value: f64,
    ) -> Self {
        ContractSpec {
            shortcode: shortcode.into(),
            display_name: display_name.into(),
            tick_size,
            point_value,
        }
    }

    //dollar value of one tick
    pub fn tick_value(&self) -> f64 {
        self.tick_size * self.point_value
    }

    //converts a price difference to ticks
    pub fn price_to_ticks(&self, price_diff: f64) -> f64 {
        price_diff / self.tick_size
    }

    //converts a tick count to a price distance
    pub fn ticks_to_price(&self, ticks: f64) -> f64 {
        ticks * self.tick_size
    }

    //checks the economics are usable for sizing and pnl
    pub fn validate(&self) -> Result<(), EvalError> {
        let reason = if !(self.tick_size.is_finite() && self.tick_size > 0.0) {
            format!("tick size must be positive, got {}", self.tick_size)
        } else if !(self.point_value.is_finite() && self.point_value > 0.0) {
            format!("point value must be positive, got {}", self.point_value)
        } else {
            return Ok(());
        };

        Err(EvalError::InvalidContract {
            shortcode: self.shortcode.clone(),
            reason,
        })
    }
}
