use crate::error::SizingError;
use crate::instrument::ContractSpec;

//relative slack that keeps exact ratios such as 1000 / 50 from flooring to 19
const FLOOR_TOLERANCE: f64 = 1e-9;

//converts a dollar risk budget and a stop distance in ticks into a contract count
pub fn size(risk_dollars: f64, stop_ticks: f64, tick_value: f64) -> Result<u32, SizingError> {
    if !(stop_ticks.is_finite() && stop_ticks > 0.0) {
        return Err(SizingError::ZeroStopDistance { stop_ticks });
    }
    if !(risk_dollars.is_finite() && risk_dollars > 0.0) {
        return Err(SizingError::InvalidRisk(risk_dollars));
    }
    if !(tick_value.is_finite() && tick_value > 0.0) {
        return Err(SizingError::InvalidTickValue(tick_value));
    }

    let raw = risk_dollars / (stop_ticks * tick_value);
    let quantity = (raw * (1.0 + FLOOR_TOLERANCE)).floor();

    //float to int casts saturate
    Ok((quantity as u32).max(1))
}

//fixed risk sizing for one run: the stop distance and tick value never change mid-run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizer {
    quantity: u32,
    stop_distance: f64,
}

impl PositionSizer {
    pub fn for_contract(
        risk_dollars: f64,
        stop_ticks: f64,
        contract: &ContractSpec,
    ) -> Result<Self, SizingError> {
        let quantity = size(risk_dollars, stop_ticks, contract.tick_value())?;
        Ok(PositionSizer {
            quantity,
            stop_distance: contract.ticks_to_price(stop_ticks),
        })
    }

    //contracts per entry
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    //stop distance in price units
    pub fn stop_distance(&self) -> f64 {
        self.stop_distance
    }
}
