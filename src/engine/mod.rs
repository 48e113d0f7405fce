pub mod evaluation;
pub mod runner;
pub mod state_machine;

pub use evaluation::{Evaluation, RunStatus};
pub use runner::run;
pub use state_machine::{Observation, Rules, SignalPoint, StateMachine, Step};
