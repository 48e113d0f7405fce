pub mod run_config;
pub mod strategy_params;

pub use run_config::RunConfiguration;
pub use strategy_params::{PairsParams, StatArbParams, StrategyParams};
