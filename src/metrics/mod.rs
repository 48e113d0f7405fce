pub mod curve;
pub mod summary;

pub use curve::{max_drawdown, merge_curves, pnl_curve, PnlPoint};
pub use summary::{comparison_table, SummaryMetrics};
