use crate::portfolio::{Trade, TradeLedger};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a point on a cumulative profit curve, one per closed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub instrument_label: String,
    pub trade_pnl: f64,
    pub cumulative_pnl: f64,
    //dollars below the running peak
    pub drawdown: f64,
}

//cumulative profit curve of trades in the order given
pub fn pnl_curve<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Vec<PnlPoint> {
    let mut curve = Vec::new();
    let mut peak = 0.0_f64;
    let mut cumulative = 0.0;

    for trade in trades {
        cumulative += trade.pnl;
        peak = peak.max(cumulative);

        curve.push(PnlPoint {
            date: trade.exit_date,
            instrument_label: trade.instrument_label.clone(),
            trade_pnl: trade.pnl,
            cumulative_pnl: cumulative,
            drawdown: peak - cumulative,
        });
    }

    curve
}

//one strategy-wide curve from several per-instrument ledgers, ordered by exit date
//trades closing on the same date keep the order of the ledgers they came from
pub fn merge_curves<'a>(ledgers: impl IntoIterator<Item = &'a TradeLedger>) -> Vec<PnlPoint> {
    let mut trades: Vec<&Trade> = ledgers.into_iter().flat_map(|l| l.iter()).collect();
    trades.sort_by_key(|t| t.exit_date);
    pnl_curve(trades)
}

//largest dollar drawdown on a curve
pub fn max_drawdown(curve: &[PnlPoint]) -> f64 {
    curve.iter().map(|point| point.drawdown).fold(0.0, f64::max)
}
