use crate::engine::state_machine::{Observation, Rules, StateMachine};
use crate::error::EvalError;
use crate::portfolio::{PositionState, TradeLedger};
use tracing::debug;

//drives the machine over the observations in date order
//no entry is taken on the final bar, and whatever is still open there is force-closed
pub fn run<R: Rules>(
    machine: &StateMachine<'_, R>,
    observations: &[Observation],
) -> Result<TradeLedger, EvalError> {
    let mut ledger = TradeLedger::new();
    let mut state = PositionState::Flat;
    let last_index = observations.len().saturating_sub(1);

    for (i, observation) in observations.iter().enumerate() {
        let step = machine.step(state, observation, i < last_index)?;

        if state.is_flat() {
            if let Some((direction, position)) = step.state.position() {
                debug!(
                    instrument = machine.label(),
                    date = %observation.date,
                    %direction,
                    price = position.entry_price,
                    quantity = position.quantity,
                    stop = position.stop_price,
                    "entry"
                );
            }
        }

        if let Some(trade) = step.trade {
            debug!(
                instrument = machine.label(),
                date = %trade.exit_date,
                reason = ?trade.exit_reason,
                price = trade.exit_price,
                pnl = trade.pnl,
                "exit"
            );
            ledger.record(trade);
        }

        state = step.state;
    }

    if let Some(last) = observations.last() {
        if let Some(trade) = machine.force_close(state, last)? {
            debug!(
                instrument = machine.label(),
                date = %trade.exit_date,
                pnl = trade.pnl,
                "open position marked at final close"
            );
            ledger.record(trade);
        }
    }

    Ok(ledger)
}
