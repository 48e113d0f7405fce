use crate::error::EvalError;
use crate::instrument::contract::ContractSpec;
use serde::{Deserialize, Serialize};

//how two legs combine into one spread price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadKind {
    //p1 - ratio * p2, ratio fixed so the legs start notional-neutral
    #[default]
    Difference,
    //(p1 / p2) * ratio, rescaled into leg 1 price units
    Ratio,
}

impl SpreadKind {
    //spread price for one pair of leg prices
    pub fn combine(self, price_1: f64, price_2: f64, hedge_ratio: f64) -> f64 {
        match self {
            SpreadKind::Difference => price_1 - hedge_ratio * price_2,
            SpreadKind::Ratio => price_1 / price_2 * hedge_ratio,
        }
    }
}

//a spread between two real contracts, traded and reported as one instrument
//quoted in leg 1 price units, so it uses leg 1 tick size and point value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticContract {
    pub leg_1: ContractSpec,
    pub leg_2: ContractSpec,
    pub kind: SpreadKind,
    pub hedge_ratio: f64,
    pub spec: ContractSpec,
}

impl SyntheticContract {
    //fixes the hedge ratio from the first aligned prices of each leg
    pub fn build(
        leg_1: &ContractSpec,
        leg_2: &ContractSpec,
        kind: SpreadKind,
        first_price_1: f64,
        first_price_2: f64,
    ) -> Result<Self, EvalError> {
        leg_1.validate()?;
        leg_2.validate()?;

        for (leg, price) in [(leg_1, first_price_1), (leg_2, first_price_2)] {
            if !(price.is_finite() && price > 0.0) {
                return Err(EvalError::InvalidContract {
                    shortcode: leg.shortcode.clone(),
                    reason: format!("cannot anchor a spread on price {}", price),
                });
            }
        }

        let hedge_ratio = match kind {
            SpreadKind::Difference => first_price_1 / first_price_2,
            SpreadKind::Ratio => first_price_2,
        };

        let spec = ContractSpec::new(
            format!("{}-{}", leg_1.shortcode, leg_2.shortcode),
            format!("{} vs {}", leg_1.display_name, leg_2.display_name),
            leg_1.tick_size,
            leg_1.point_value,
        );

        Ok(SyntheticContract {
            leg_1: leg_1.clone(),
            leg_2: leg_2.clone(),
            kind,
            hedge_ratio,
            spec,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.shortcode
    }

    //spread price for one pair of leg prices
    pub fn price(&self, price_1: f64, price_2: f64) -> f64 {
        self.kind.combine(price_1, price_2, self.hedge_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn legs() -> (ContractSpec, ContractSpec) {
        (
            ContractSpec::new("GC", "Gold", 0.1, 100.0),
            ContractSpec::new("SI", "Silver", 0.005, 5000.0),
        )
    }

    #[test]
    fn difference_spread_starts_flat() {
        let (gc, si) = legs();
        let synthetic = SyntheticContract::build(&gc, &si, SpreadKind::Difference, 2000.0, 25.0).unwrap();
        assert_eq!(synthetic.name(), "GC-SI");
        assert_relative_eq!(synthetic.hedge_ratio, 80.0);
        assert_relative_eq!(synthetic.price(2000.0, 25.0), 0.0);
        assert_relative_eq!(synthetic.price(2010.0, 25.0), 10.0);
        assert_eq!(synthetic.spec.tick_size, 0.1);
        assert_eq!(synthetic.spec.point_value, 100.0);
    }

    #[test]
    fn ratio_spread_starts_at_leg_one() {
        let (gc, si) = legs();
        let synthetic = SyntheticContract::build(&gc, &si, SpreadKind::Ratio, 2000.0, 25.0).unwrap();
        assert_relative_eq!(synthetic.price(2000.0, 25.0), 2000.0);
        assert_relative_eq!(synthetic.price(2000.0, 20.0), 2500.0);
    }

    #[test]
    fn rejects_non_positive_anchor() {
        let (gc, si) = legs();
        assert!(SyntheticContract::build(&gc, &si, SpreadKind::Difference, 2000.0, 0.0).is_err());
    }
}
