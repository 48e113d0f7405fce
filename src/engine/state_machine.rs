use crate::error::EvalError;
use crate::portfolio::{Direction, ExitReason, OpenPosition, PositionSizer, PositionState, Trade};
use chrono::NaiveDate;

//a signal value next to its moving average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub value: f64,
    pub average: f64,
}

impl SignalPoint {
    pub fn new(value: f64, average: f64) -> Self {
        SignalPoint { value, average }
    }

    //signed distance of the value from its average
    pub fn deviation(&self) -> f64 {
        self.value - self.average
    }
}

//everything the state machine sees on one bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,

    //close of the traded instrument, fills and stops both use it
    pub close: f64,

    //none while the moving average lacks history
    pub signal: Option<SignalPoint>,

    //previous bar's signal, for crossing rules
    pub previous: Option<SignalPoint>,

    //false when a filter vetoes new entries on this bar
    pub admissible: bool,
}

//entry and signal-exit rules of one strategy, stops are handled by the machine
pub trait Rules {
    //called while flat; returns the side to open, if any
    fn entry(&self, current: SignalPoint, previous: Option<SignalPoint>) -> Option<Direction>;

    //called while a position is open and its stop has not been hit
    fn signal_exit(&self, direction: Direction, current: SignalPoint) -> bool;
}

//result of one step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: PositionState,
    pub trade: Option<Trade>,
}

impl Step {
    fn hold(state: PositionState) -> Self {
        Step { state, trade: None }
    }
}

//flat/long/short machine for one run over one traded instrument
#[derive(Debug, Clone)]
pub struct StateMachine<'a, R: Rules> {
    rules: &'a R,
    label: &'a str,
    point_value: f64,
    sizer: PositionSizer,
}

impl<'a, R: Rules> StateMachine<'a, R> {
    pub fn new(rules: &'a R, label: &'a str, point_value: f64, sizer: PositionSizer) -> Self {
        StateMachine {
            rules,
            label,
            point_value,
            sizer,
        }
    }

    pub fn label(&self) -> &str {
        self.label
    }

    //advances the machine by one bar
    //an exit returns to flat without re-entering on the same bar
    //a close at or through the stop is checked before the strategy's own exit and fills at the stop price
    pub fn step(
        &self,
        state: PositionState,
        observation: &Observation,
        entries_allowed: bool,
    ) -> Result<Step, EvalError> {
        let Some((direction, position)) = state.position() else {
            return Ok(Step::hold(self.try_enter(observation, entries_allowed)));
        };

        if position.stop_hit(direction, observation.close) {
            let trade = self.close(
                direction,
                position,
                observation.date,
                position.stop_price,
                ExitReason::StopLoss,
            )?;
            return Ok(Step {
                state: PositionState::Flat,
                trade: Some(trade),
            });
        }

        match observation.signal {
            Some(point) if self.rules.signal_exit(direction, point) => {
                let trade = self.close(
                    direction,
                    position,
                    observation.date,
                    observation.close,
                    ExitReason::Signal,
                )?;
                Ok(Step {
                    state: PositionState::Flat,
                    trade: Some(trade),
                })
            }
            _ => Ok(Step::hold(state)),
        }
    }

    //marks an open position to the final close
    pub fn force_close(
        &self,
        state: PositionState,
        last: &Observation,
    ) -> Result<Option<Trade>, EvalError> {
        match state.position() {
            Some((direction, position)) => self
                .close(direction, position, last.date, last.close, ExitReason::EndOfData)
                .map(Some),
            None => Ok(None),
        }
    }

    fn try_enter(&self, observation: &Observation, entries_allowed: bool) -> PositionState {
        if !(entries_allowed && observation.admissible) {
            return PositionState::Flat;
        }

        let Some(current) = observation.signal else {
            return PositionState::Flat;
        };

        match self.rules.entry(current, observation.previous) {
            Some(direction) => PositionState::opened(
                direction,
                OpenPosition::open(
                    direction,
                    observation.date,
                    observation.close,
                    self.sizer.quantity(),
                    self.sizer.stop_distance(),
                ),
            ),
            None => PositionState::Flat,
        }
    }

    fn close(
        &self,
        direction: Direction,
        position: &OpenPosition,
        date: NaiveDate,
        price: f64,
        reason: ExitReason,
    ) -> Result<Trade, EvalError> {
        Trade::close(
            self.label,
            direction,
            position,
            date,
            price,
            reason,
            self.point_value,
        )
    }
}
