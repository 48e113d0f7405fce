use crate::error::EvalError;
use crate::portfolio::position::{Direction, OpenPosition};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    Signal,
    EndOfData,
}

//a closed round trip, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub instrument_label: String,
    pub direction: Direction,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub quantity: u32,
    pub pnl: f64,
    pub exit_reason: ExitReason,
}

impl Trade {
    //closes `position` into a trade, the exit must come after the entry
    pub fn close(
        instrument_label: &str,
        direction: Direction,
        position: &OpenPosition,
        exit_date: NaiveDate,
        exit_price: f64,
        exit_reason: ExitReason,
        point_value: f64,
    ) -> Result<Self, EvalError> {
        if exit_date <= position.entry_date {
            return Err(EvalError::NonChronologicalTrade {
                entry_date: position.entry_date,
                exit_date,
            });
        }

        Ok(Trade {
            instrument_label: instrument_label.to_string(),
            direction,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date,
            exit_price,
            quantity: position.quantity,
            pnl: realized_pnl(
                direction,
                position.entry_price,
                exit_price,
                position.quantity,
                point_value,
            ),
            exit_reason,
        })
    }

    //pnl implied by the stored prices, bit-identical to `pnl` for the same point value
    pub fn expected_pnl(&self, point_value: f64) -> f64 {
        realized_pnl(
            self.direction,
            self.entry_price,
            self.exit_price,
            self.quantity,
            point_value,
        )
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

fn realized_pnl(
    direction: Direction,
    entry_price: f64,
    exit_price: f64,
    quantity: u32,
    point_value: f64,
) -> f64 {
    (exit_price - entry_price) * direction.sign() * quantity as f64 * point_value
}

//closed trades of one evaluation run, in close order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn last(&self) -> Option<&Trade> {
        self.trades.last()
    }

    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

impl FromIterator<Trade> for TradeLedger {
    fn from_iter<I: IntoIterator<Item = Trade>>(iter: I) -> Self {
        TradeLedger {
            trades: iter.into_iter().collect(),
        }
    }
}
