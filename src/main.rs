use anyhow::{bail, Context, Result};
use backcast::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "backcast")]
#[command(about = "A Rust-based strategy evaluation engine for futures", long_about = None)]
struct Cli {
    //json run configuration (defaults to the built-in cme batch)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    //more log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //trend following on one instrument
    Trend {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        //contract shortcode (eg ES, CL)
        #[arg(long)]
        shortcode: String,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    //pairs mean reversion on a two-leg spread
    Pairs {
        //csv for the first leg
        #[arg(long)]
        data_1: PathBuf,

        //csv for the second leg
        #[arg(long)]
        data_2: PathBuf,

        #[arg(long)]
        leg_1: String,

        #[arg(long)]
        leg_2: String,

        //use the price ratio instead of the hedged difference
        #[arg(long)]
        ratio: bool,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    //correlation-gated stat-arb, trades the primary leg
    StatArb {
        //csv for the traded leg
        #[arg(long)]
        primary_data: PathBuf,

        //csv for the reference leg
        #[arg(long)]
        reference_data: PathBuf,

        #[arg(long)]
        primary: String,

        #[arg(long)]
        reference: String,

        //minimum return correlation for new entries
        #[arg(long)]
        min_correlation: Option<f64>,

        #[arg(long)]
        ratio: bool,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    //every strategy over the configured universes
    RunAll {
        //directory with market_data_<shortcode>.csv files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        //directory for trades and profit curve csvs
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    //write the effective configuration as json
    WriteConfig {
        path: PathBuf,
    },
}

//overrides for the strategy parameters in the configuration
#[derive(Args)]
struct ParamArgs {
    //distance from the moving average that triggers an entry
    #[arg(long)]
    net_change: Option<f64>,

    //moving average lookback in bars
    #[arg(long)]
    lookback: Option<usize>,

    //stop distance in ticks
    #[arg(long)]
    loss_ticks: Option<f64>,

    //dollars at risk per trade
    #[arg(long)]
    risk: Option<f64>,
}

impl ParamArgs {
    fn apply(&self, mut params: StrategyParams) -> StrategyParams {
        if let Some(net_change) = self.net_change {
            params.net_change = net_change;
        }
        if let Some(lookback) = self.lookback {
            params.ma_lookback_days = lookback;
        }
        if let Some(loss_ticks) = self.loss_ticks {
            params.loss_ticks = loss_ticks;
        }
        if let Some(risk) = self.risk {
            params.risk_dollars = risk;
        }
        params
    }
}

#[derive(Args)]
struct OutputArgs {
    //output path for trades csv
    #[arg(long)]
    output_trades_csv: Option<PathBuf>,

    //output path for profit curve csv
    #[arg(long)]
    output_curve_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = match &cli.config {
        Some(path) => RunConfiguration::from_json_file(path)?,
        None => RunConfiguration::default(),
    };

    match cli.command {
        Commands::Trend {
            data,
            shortcode,
            params,
            output,
        } => {
            let contract = contract(&config, &shortcode)?;
            let series = load_series(&data, &shortcode)?;
            let evaluator = TrendFollowEvaluator::new(params.apply(config.trend))?;
            let evaluation = evaluator.evaluate(contract, &series)?;
            report(&evaluation, &output)?;
        }
        Commands::Pairs {
            data_1,
            data_2,
            leg_1,
            leg_2,
            ratio,
            params,
            output,
        } => {
            let contract_1 = contract(&config, &leg_1)?;
            let contract_2 = contract(&config, &leg_2)?;
            let series_1 = load_series(&data_1, &leg_1)?;
            let series_2 = load_series(&data_2, &leg_2)?;

            let mut pairs = PairsParams::new(params.apply(config.pairs.base));
            pairs.spread = spread_kind(ratio, config.pairs.spread);
            let evaluator = PairsReversionEvaluator::new(pairs)?;
            let evaluation = evaluator.evaluate(contract_1, contract_2, &series_1, &series_2)?;
            report(&evaluation, &output)?;
        }
        Commands::StatArb {
            primary_data,
            reference_data,
            primary,
            reference,
            min_correlation,
            ratio,
            params,
            output,
        } => {
            let primary_contract = contract(&config, &primary)?;
            let reference_contract = contract(&config, &reference)?;
            let primary_series = load_series(&primary_data, &primary)?;
            let reference_series = load_series(&reference_data, &reference)?;

            let stat_arb = StatArbParams::new(
                params.apply(config.stat_arb.base),
                min_correlation.unwrap_or(config.stat_arb.min_correlation),
            )
            .with_spread(spread_kind(ratio, config.stat_arb.spread));
            let evaluator = StatArbEvaluator::new(stat_arb)?;
            let evaluation = evaluator.evaluate(
                primary_contract,
                reference_contract,
                &primary_series,
                &reference_series,
            )?;
            report(&evaluation, &output)?;
        }
        Commands::RunAll {
            data_dir,
            output_dir,
        } => {
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if output_dir.is_some() {
                config.output_dir = output_dir;
            }
            run_all(&config)?;
        }
        Commands::WriteConfig { path } => {
            config.to_json_file(&path)?;
            println!("Configuration saved to {:?}", path);
        }
    }

    Ok(())
}

fn contract<'a>(config: &'a RunConfiguration, shortcode: &str) -> Result<&'a ContractSpec> {
    config
        .contracts
        .get(shortcode)
        .with_context(|| format!("Unknown contract shortcode {}", shortcode))
}

fn spread_kind(ratio: bool, configured: SpreadKind) -> SpreadKind {
    if ratio {
        SpreadKind::Ratio
    } else {
        configured
    }
}

//print one run and save its outputs if requested
fn report(evaluation: &Evaluation, output: &OutputArgs) -> Result<()> {
    println!("Backcast Futures Strategy Evaluation");
    println!("====================================\n");
    println!(
        "Strategy: {}  Instrument: {} ({})",
        evaluation.strategy,
        evaluation.label(),
        evaluation.contract.display_name
    );

    let Some(ledger) = evaluation.ledger() else {
        match evaluation.status {
            RunStatus::InsufficientHistory {
                available,
                required,
            } => bail!(
                "Insufficient history: {} bars available, {} required",
                available,
                required
            ),
            RunStatus::UnanchoredSpread { date } => bail!(
                "No positive price on {} to fix the hedge ratio from",
                date
            ),
            RunStatus::Completed => return Ok(()),
        }
    };

    let summary = SummaryMetrics::from_trades(ledger.trades());
    summary.pretty_print_table(evaluation.label());

    if let Some(path) = &output.output_trades_csv {
        save_trades_csv(ledger.trades(), path)?;
        println!("\nTrades saved to {:?}", path);
    }
    if let Some(path) = &output.output_curve_csv {
        save_curve_csv(&pnl_curve(ledger), path)?;
        println!("Profit curve saved to {:?}", path);
    }

    Ok(())
}

fn run_all(config: &RunConfiguration) -> Result<()> {
    config.validate()?;

    let data = MarketData::load(config);
    if data.is_empty() {
        bail!("No market data found in {:?}", config.data_dir);
    }
    info!(instruments = data.len(), data_dir = ?config.data_dir, "market data loaded");

    let batches = [
        (StrategyKind::TrendFollow, run_trend(config, &data)?),
        (StrategyKind::PairsReversion, run_pairs(config, &data)?),
        (StrategyKind::StatArb, run_stat_arb(config, &data)?),
    ];

    let mut overall = Vec::new();
    for (kind, evaluations) in &batches {
        let rows: Vec<(String, SummaryMetrics)> = evaluations
            .iter()
            .filter_map(|evaluation| {
                let ledger = evaluation.ledger()?;
                Some((evaluation.label().to_string(), SummaryMetrics::from_trades(ledger.trades())))
            })
            .collect();

        let skipped = evaluations.len() - rows.len();
        println!("\n{} ({} runs, {} skipped)", kind.name(), rows.len(), skipped);
        comparison_table(&rows).printstd();

        let trades: Vec<Trade> = evaluations
            .iter()
            .filter_map(Evaluation::ledger)
            .flat_map(|ledger| ledger.iter().cloned())
            .collect();
        overall.push((kind.name().to_string(), SummaryMetrics::from_trades(&trades)));

        if let Some(dir) = &config.output_dir {
            write_outputs(dir, *kind, evaluations)?;
        }
    }

    println!("\nStrategy comparison");
    comparison_table(&overall).printstd();

    if let Some(dir) = &config.output_dir {
        println!("\nOutputs saved to {:?}", dir);
    }

    Ok(())
}
