use crate::error::SignalError;
use crate::signal::returns;
use statrs::statistics::Statistics;

//pearson correlation of the returns of the last `lookback` closes of two aligned sequences
pub fn correlation(closes_1: &[f64], closes_2: &[f64], lookback: usize) -> Result<f64, SignalError> {
    if closes_1.len() != closes_2.len() {
        return Err(SignalError::LengthMismatch {
            left: closes_1.len(),
            right: closes_2.len(),
        });
    }

    //two returns are the least a correlation can be computed from
    let required = lookback.max(3);
    if closes_1.len() < required {
        return Err(SignalError::InsufficientHistory {
            available: closes_1.len(),
            required,
        });
    }

    let start = closes_1.len() - required;
    let returns_1 = returns(&closes_1[start..]);
    let returns_2 = returns(&closes_2[start..]);

    let sd_1 = returns_1.iter().std_dev();
    let sd_2 = returns_2.iter().std_dev();
    if !(sd_1 > 0.0 && sd_2 > 0.0) {
        return Err(SignalError::Degenerate);
    }

    let rho = returns_1.iter().covariance(returns_2.iter()) / (sd_1 * sd_2);
    if !rho.is_finite() {
        return Err(SignalError::Degenerate);
    }

    //rounding can push a perfect fit just past the bounds
    Ok(rho.clamp(-1.0, 1.0))
}

//correlation ending at each index
pub fn rolling_correlation(
    closes_1: &[f64],
    closes_2: &[f64],
    lookback: usize,
) -> Vec<Result<f64, SignalError>> {
    let n = closes_1.len().min(closes_2.len());
    (0..n)
        .map(|i| correlation(&closes_1[..=i], &closes_2[..=i], lookback))
        .collect()
}
