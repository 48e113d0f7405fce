use crate::metrics::curve::{max_drawdown, pnl_curve};
use crate::portfolio::Trade;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//trade statistics of one ledger or of a merged strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    //gross profit over gross loss, none while nothing has lost
    pub profit_factor: Option<f64>,
    pub max_drawdown: f64,
    //mean over standard deviation of per-trade pnl, not annualised
    pub trade_sharpe: f64,
    pub avg_holding_days: f64,
}

impl SummaryMetrics {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
        let wins: Vec<f64> = pnls.iter().copied().filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = pnls.iter().copied().filter(|&p| p < 0.0).collect();

        let total_wins: f64 = wins.iter().sum();
        let total_losses: f64 = losses.iter().sum::<f64>().abs();

        let profit_factor = (total_losses > 0.0).then(|| total_wins / total_losses);

        let average = |values: &[f64]| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };

        let holding: Vec<f64> = trades.iter().map(|t| t.holding_days() as f64).collect();

        SummaryMetrics {
            num_trades: trades.len(),
            num_winning_trades: wins.len(),
            num_losing_trades: losses.len(),
            total_pnl: pnls.iter().sum(),
            win_rate: if trades.is_empty() {
                0.0
            } else {
                wins.len() as f64 / trades.len() as f64
            },
            avg_win: average(&wins),
            avg_loss: average(&losses),
            largest_win: wins.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: losses.iter().fold(0.0f64, |a, &b| a.min(b)),
            profit_factor,
            max_drawdown: max_drawdown(&pnl_curve(trades)),
            trade_sharpe: trade_sharpe(&pnls),
            avg_holding_days: average(&holding),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self, title: &str) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new(title), Cell::new("Value")]));

        let rows = [
            ("Number of Trades", format!("{}", self.num_trades)),
            ("Total P&L", format!("${:.2}", self.total_pnl)),
            ("Win Rate", format!("{:.2}%", self.win_rate * 100.0)),
            ("Avg Win", format!("${:.2}", self.avg_win)),
            ("Avg Loss", format!("${:.2}", self.avg_loss)),
            ("Largest Win", format!("${:.2}", self.largest_win)),
            ("Largest Loss", format!("${:.2}", self.largest_loss)),
            ("Profit Factor", format_factor(self.profit_factor, 3)),
            ("Max Drawdown", format!("${:.2}", self.max_drawdown)),
            ("Trade Sharpe", format!("{:.3}", self.trade_sharpe)),
            ("Avg Holding Days", format!("{:.1}", self.avg_holding_days)),
        ];

        for (name, value) in rows {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table.printstd();
    }
}

//one row per instrument, for batch runs
pub fn comparison_table(rows: &[(String, SummaryMetrics)]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(
        ["Instrument", "Trades", "Total P&L", "Win Rate", "Profit Factor", "Max DD"]
            .iter()
            .map(|h| Cell::new(h))
            .collect(),
    ));

    for (label, metrics) in rows {
        table.add_row(Row::new(vec![
            Cell::new(label),
            Cell::new(&metrics.num_trades.to_string()),
            Cell::new(&format!("${:.2}", metrics.total_pnl)),
            Cell::new(&format!("{:.1}%", metrics.win_rate * 100.0)),
            Cell::new(&format_factor(metrics.profit_factor, 2)),
            Cell::new(&format!("${:.2}", metrics.max_drawdown)),
        ]));
    }

    table
}

fn format_factor(factor: Option<f64>, precision: usize) -> String {
    match factor {
        Some(value) => format!("{:.*}", precision, value),
        None => "n/a".to_string(),
    }
}

fn trade_sharpe(pnls: &[f64]) -> f64 {
    if pnls.len() < 2 {
        return 0.0;
    }

    let mean = pnls.mean();
    let std_dev = pnls.std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    mean / std_dev
}
