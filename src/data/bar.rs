use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarError {
    #[error("Invalid OHLC values on {date}: high ({high}) < low ({low})")]
    InvalidHighLow { date: NaiveDate, high: f64, low: f64 },
    #[error("Invalid OHLC values on {date}: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose {
        date: NaiveDate,
        close: f64,
        high: f64,
        low: f64,
    },
    #[error("Invalid OHLC values on {date}: open ({open}) outside high-low range [{low}, {high}]")]
    InvalidOpen {
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
    },
    #[error("Non-finite price on {0}")]
    NonFinite(NaiveDate),
}

//one trading day of ohlc data for a single instrument
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Result<Self, BarError> {
        if ![open, high, low, close].iter().all(|v| v.is_finite()) {
            return Err(BarError::NonFinite(date));
        }

        //validate high >= low
        if high < low {
            return Err(BarError::InvalidHighLow { date, high, low });
        }

        //validate close within [low, high]
        if close < low || close > high {
            return Err(BarError::InvalidClose {
                date,
                close,
                high,
                low,
            });
        }

        //validate open within [low, high]
        if open < low || open > high {
            return Err(BarError::InvalidOpen {
                date,
                open,
                high,
                low,
            });
        }

        Ok(Bar {
            date,
            open,
            high,
            low,
            close,
        })
    }

    //creates a flat bar when only the close is known
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Bar {
            date,
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    //returns the range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = Bar::new(day(1), 10.0, 9.0, 11.0, 10.0).unwrap_err();
        assert!(matches!(err, BarError::InvalidHighLow { .. }));
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = Bar::new(day(1), 10.0, 11.0, 9.0, 12.0).unwrap_err();
        assert!(matches!(err, BarError::InvalidClose { .. }));
    }

    #[test]
    fn rejects_nan() {
        assert_eq!(
            Bar::new(day(2), f64::NAN, 11.0, 9.0, 10.0),
            Err(BarError::NonFinite(day(2)))
        );
    }

    #[test]
    fn flat_bar_from_close() {
        let bar = Bar::from_close(day(4), 101.5);
        assert_eq!(bar.low, 101.5);
        assert_eq!(bar.high, 101.5);
        assert_eq!(bar.range(), 0.0);
    }
}
