use crate::config::RunConfiguration;
use crate::data::{load_series, MarketSeries};
use crate::engine::Evaluation;
use crate::error::EvalError;
use crate::instrument::ContractSpec;
use crate::metrics::{merge_curves, pnl_curve, PnlPoint};
use crate::portfolio::Trade;
use crate::strategy::{
    PairsReversionEvaluator, StatArbEvaluator, StrategyKind, TrendFollowEvaluator,
};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

//market data for every shortcode a configuration references, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    series: IndexMap<String, MarketSeries>,
}

impl MarketData {
    //loads each referenced csv, a missing or unreadable file is logged and skipped
    pub fn load(config: &RunConfiguration) -> Self {
        let mut shortcodes: Vec<&String> = config.trend_universe.iter().collect();
        for (a, b) in config.pairs_universe.iter().chain(&config.relative_universe) {
            shortcodes.push(a);
            shortcodes.push(b);
        }

        let mut data = MarketData::default();
        for shortcode in shortcodes {
            if data.series.contains_key(shortcode) {
                continue;
            }
            match load_series(config.csv_path(shortcode), shortcode) {
                Ok(series) => data.insert(series),
                Err(err) => {
                    let reason = format!("{:#}", err);
                    warn!(shortcode = %shortcode, %reason, "no market data, skipped");
                }
            }
        }
        data
    }

    pub fn insert(&mut self, series: MarketSeries) {
        self.series.insert(series.shortcode().to_string(), series);
    }

    pub fn get(&self, shortcode: &str) -> Option<&MarketSeries> {
        self.series.get(shortcode)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

//runs trend following over the configured universe, one evaluation per instrument with data
pub fn run_trend(config: &RunConfiguration, data: &MarketData) -> Result<Vec<Evaluation>> {
    let evaluator = TrendFollowEvaluator::new(config.trend).context("trend parameters")?;

    let evaluations: Result<Vec<Evaluation>, EvalError> = config
        .trend_universe
        .par_iter()
        .filter_map(|shortcode| {
            let (contract, series) = resolve(config, data, shortcode)?;
            Some(evaluator.evaluate(contract, series))
        })
        .collect();

    Ok(evaluations?)
}

//runs pairs reversion over the configured pairs
pub fn run_pairs(config: &RunConfiguration, data: &MarketData) -> Result<Vec<Evaluation>> {
    let evaluator = PairsReversionEvaluator::new(config.pairs).context("pairs parameters")?;

    let evaluations: Result<Vec<Evaluation>, EvalError> = config
        .pairs_universe
        .par_iter()
        .filter_map(|(a, b)| {
            let (leg_1, series_1) = resolve(config, data, a)?;
            let (leg_2, series_2) = resolve(config, data, b)?;
            Some(evaluator.evaluate(leg_1, leg_2, series_1, series_2))
        })
        .collect();

    Ok(evaluations?)
}

//runs stat-arb over the configured primary/reference pairs
pub fn run_stat_arb(config: &RunConfiguration, data: &MarketData) -> Result<Vec<Evaluation>> {
    let evaluator = StatArbEvaluator::new(config.stat_arb).context("stat-arb parameters")?;

    let evaluations: Result<Vec<Evaluation>, EvalError> = config
        .relative_universe
        .par_iter()
        .filter_map(|(primary, reference)| {
            let (primary, primary_series) = resolve(config, data, primary)?;
            let (reference, reference_series) = resolve(config, data, reference)?;
            Some(evaluator.evaluate(primary, reference, primary_series, reference_series))
        })
        .collect();

    Ok(evaluations?)
}

//writes one strategy's trades and merged profit curve, then a curve per completed run
//file names: trades_<strategy>.csv, profit_curve_<strategy>.csv, profit_curve_<strategy>_<label>.csv
pub fn write_outputs(dir: &Path, strategy: StrategyKind, evaluations: &[Evaluation]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let ledgers: Vec<_> = evaluations.iter().filter_map(Evaluation::ledger).collect();
    let trades: Vec<Trade> = ledgers.iter().flat_map(|l| l.iter().cloned()).collect();
    let name = strategy.name();

    save_trades_csv(&trades, &dir.join(format!("trades_{}.csv", name)))?;
    save_curve_csv(
        &merge_curves(ledgers.iter().copied()),
        &dir.join(format!("profit_curve_{}.csv", name)),
    )?;

    for evaluation in evaluations {
        if let Some(ledger) = evaluation.ledger() {
            let path = dir.join(format!("profit_curve_{}_{}.csv", name, evaluation.label()));
            save_curve_csv(&pnl_curve(ledger), &path)?;
        }
    }

    info!(strategy = name, dir = ?dir, runs = ledgers.len(), "outputs written");
    Ok(())
}

pub fn save_trades_csv(trades: &[Trade], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for trade in trades {
        writer.serialize(trade)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_curve_csv(curve: &[PnlPoint], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for point in curve {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

fn resolve<'a>(
    config: &'a RunConfiguration,
    data: &'a MarketData,
    shortcode: &str,
) -> Option<(&'a ContractSpec, &'a MarketSeries)> {
    let Some(contract) = config.contracts.get(shortcode) else {
        warn!(shortcode, "unknown contract, skipped");
        return None;
    };
    let series = data.get(shortcode)?;
    Some((contract, series))
}
