//a Rust-based strategy evaluation engine for futures contracts

pub mod batch;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod metrics;
pub mod portfolio;
pub mod signal;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{
        run_pairs, run_stat_arb, run_trend, save_curve_csv, save_trades_csv, write_outputs,
        MarketData,
    };
    pub use crate::config::{PairsParams, RunConfiguration, StatArbParams, StrategyParams};
    pub use crate::data::{load_series, Bar, MarketSeries};
    pub use crate::engine::{Evaluation, RunStatus};
    pub use crate::error::{EvalError, SignalError, SizingError};
    pub use crate::instrument::{ContractRegistry, ContractSpec, SpreadKind, SyntheticContract};
    pub use crate::metrics::{comparison_table, merge_curves, pnl_curve, PnlPoint, SummaryMetrics};
    pub use crate::portfolio::{Direction, ExitReason, PositionSizer, Trade, TradeLedger};
    pub use crate::strategy::{
        PairsReversionEvaluator, StatArbEvaluator, StrategyKind, TrendFollowEvaluator,
    };
}
