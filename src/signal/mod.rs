//rolling indicators shared by every evaluator
pub mod align;
pub mod correlation;
pub mod spread;

pub use align::align;
pub use correlation::{correlation, rolling_correlation};
pub use spread::spread;

use crate::error::SignalError;
use statrs::statistics::Statistics;

//simple moving average of the last `lookback` values
pub fn sma(values: &[f64], lookback: usize) -> Result<f64, SignalError> {
    if lookback == 0 || values.len() < lookback {
        return Err(SignalError::InsufficientHistory {
            available: values.len(),
            required: lookback.max(1),
        });
    }
    Ok(values[values.len() - lookback..].iter().mean())
}

//moving average ending at each index, none until the window fills
pub fn rolling_sma(values: &[f64], lookback: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| sma(&values[..=i], lookback).ok())
        .collect()
}

//simple returns, one shorter than the input
pub fn returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_uses_trailing_window() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(sma(&closes, 2).unwrap(), 4.5);
        assert_relative_eq!(sma(&closes, 5).unwrap(), 3.0);
    }

    #[test]
    fn sma_reports_insufficient_history() {
        assert_eq!(
            sma(&[1.0, 2.0], 3),
            Err(SignalError::InsufficientHistory {
                available: 2,
                required: 3
            })
        );
        assert!(sma(&[1.0], 0).is_err());
    }

    #[test]
    fn rolling_sma_fills_after_lookback() {
        let averages = rolling_sma(&[2.0, 4.0, 6.0, 8.0], 3);
        assert_eq!(averages[0], None);
        assert_eq!(averages[1], None);
        assert_relative_eq!(averages[2].unwrap(), 4.0);
        assert_relative_eq!(averages[3].unwrap(), 6.0);
    }

    #[test]
    fn simple_returns() {
        let r = returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.1, epsilon = 1e-12);
    }
}
