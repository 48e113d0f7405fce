use crate::error::SignalError;
use crate::instrument::SpreadKind;

//pointwise spread of two date-aligned close sequences
pub fn spread(
    closes_1: &[f64],
    closes_2: &[f64],
    kind: SpreadKind,
    hedge_ratio: f64,
) -> Result<Vec<f64>, SignalError> {
    if closes_1.len() != closes_2.len() {
        return Err(SignalError::LengthMismatch {
            left: closes_1.len(),
            right: closes_2.len(),
        });
    }

    Ok(closes_1
        .iter()
        .zip(closes_2)
        .map(|(&p1, &p2)| kind.combine(p1, p2, hedge_ratio))
        .collect())
}
