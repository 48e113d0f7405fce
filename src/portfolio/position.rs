use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//side of an open position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    //converts to pnl sign (Long = +1, Short = -1)
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

//an open position between its entry and its exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub quantity: u32,
    pub stop_price: f64,
}

impl OpenPosition {
    //opens at `entry_price` with the stop `stop_distance` price units against the position
    pub fn open(
        direction: Direction,
        entry_date: NaiveDate,
        entry_price: f64,
        quantity: u32,
        stop_distance: f64,
    ) -> Self {
        OpenPosition {
            entry_date,
            entry_price,
            quantity,
            stop_price: entry_price - direction.sign() * stop_distance,
        }
    }

    //true when `close` is at or through the stop
    pub fn stop_hit(&self, direction: Direction, close: f64) -> bool {
        match direction {
            Direction::Long => close <= self.stop_price,
            Direction::Short => close >= self.stop_price,
        }
    }

    //calculates unrealized pnl at a given price
    pub fn unrealized_pnl(&self, direction: Direction, price: f64, point_value: f64) -> f64 {
        (price - self.entry_price) * direction.sign() * self.quantity as f64 * point_value
    }
}

//position state of one evaluation run, at most one position is ever open
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenPosition),
    Short(OpenPosition),
}

impl PositionState {
    pub fn opened(direction: Direction, position: OpenPosition) -> Self {
        match direction {
            Direction::Long => PositionState::Long(position),
            Direction::Short => PositionState::Short(position),
        }
    }

    //returns the open position and its side, or none if flat
    pub fn position(&self) -> Option<(Direction, &OpenPosition)> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(position) => Some((Direction::Long, position)),
            PositionState::Short(position) => Some((Direction::Short, position)),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.position().map(|(direction, _)| direction)
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }
}
