use crate::config::strategy_params::{PairsParams, StatArbParams, StrategyParams};
use crate::instrument::{default_pairs, default_relative_pairs, ContractRegistry};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete batch configuration: where the data lives, which contracts, which parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    //directory holding market_data_<shortcode>.csv files
    pub data_dir: PathBuf,

    //contract specifications
    pub contracts: ContractRegistry,

    //strategy parameters
    pub trend: StrategyParams,
    pub pairs: PairsParams,
    pub stat_arb: StatArbParams,

    //instruments for each strategy
    pub trend_universe: Vec<String>,
    pub pairs_universe: Vec<(String, String)>,
    pub relative_universe: Vec<(String, String)>,

    //optional directory for trade and profit curve csvs
    pub output_dir: Option<PathBuf>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        let contracts = ContractRegistry::cme();
        let trend_universe = contracts.shortcodes().map(str::to_string).collect();

        RunConfiguration {
            data_dir: PathBuf::from("MarketData/csvs"),
            contracts,
            trend: StrategyParams::default(),
            pairs: PairsParams::default(),
            stat_arb: StatArbParams::default(),
            trend_universe,
            pairs_universe: default_pairs(),
            relative_universe: default_relative_pairs(),
            output_dir: None,
        }
    }
}

impl RunConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: RunConfiguration = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config {:?}", path))?;
        Ok(())
    }

    //csv path for one instrument
    pub fn csv_path(&self, shortcode: &str) -> PathBuf {
        self.data_dir.join(format!("market_data_{}.csv", shortcode))
    }

    //checks parameters and that every referenced shortcode is a known contract
    pub fn validate(&self) -> anyhow::Result<()> {
        self.trend.validate().context("trend parameters")?;
        self.pairs.validate().context("pairs parameters")?;
        self.stat_arb.validate().context("stat-arb parameters")?;

        let referenced = self
            .trend_universe
            .iter()
            .chain(self.pairs_universe.iter().flat_map(|(a, b)| [a, b]))
            .chain(self.relative_universe.iter().flat_map(|(a, b)| [a, b]));

        for shortcode in referenced {
            match self.contracts.get(shortcode) {
                Some(contract) => contract.validate()?,
                None => bail!("Unknown contract shortcode {}", shortcode),
            }
        }

        Ok(())
    }
}
