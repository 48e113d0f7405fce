use chrono::NaiveDate;
use thiserror::Error;

//errors raised while computing a rolling signal
//these are recoverable: the caller skips the bar
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("insufficient history: have {available} values, need {required}")]
    InsufficientHistory { available: usize, required: usize },
    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("correlation undefined: zero variance in window")]
    Degenerate,
}

//errors raised by the position sizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("stop distance must be positive, got {stop_ticks} ticks")]
    ZeroStopDistance { stop_ticks: f64 },
    #[error("risk budget must be positive, got {0}")]
    InvalidRisk(f64),
    #[error("tick value must be positive, got {0}")]
    InvalidTickValue(f64),
}

//fatal configuration errors, the run aborts and no ledger is produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("stop distance must be positive, got {stop_ticks} ticks")]
    ZeroStopDistance { stop_ticks: f64 },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid contract {shortcode}: {reason}")]
    InvalidContract { shortcode: String, reason: String },
    #[error("position sizing failed: {0}")]
    Sizing(SizingError),
    #[error("signal computation failed: {0}")]
    Signal(#[from] SignalError),
    #[error("trade on {exit_date} would close before it opened on {entry_date}")]
    NonChronologicalTrade {
        entry_date: NaiveDate,
        exit_date: NaiveDate,
    },
}

impl From<SizingError> for EvalError {
    fn from(err: SizingError) -> Self {
        match err {
            SizingError::ZeroStopDistance { stop_ticks } => EvalError::ZeroStopDistance { stop_ticks },
            other => EvalError::Sizing(other),
        }
    }
}

impl EvalError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EvalError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
