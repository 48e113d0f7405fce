use crate::instrument::contract::ContractSpec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

//lookup of contract specifications keyed by shortcode, in universe order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractRegistry {
    contracts: IndexMap<String, ContractSpec>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    //the cme universe with exchange tick sizes and point values
    pub fn cme() -> Self {
        let mut registry = Self::new();
        for (shortcode, name, tick_size, point_value) in [
            ("ES", "S&P Equity index", 0.25, 50.0),
            ("NQ", "NASDAQ Equity index", 0.25, 20.0),
            ("CL", "Crude Oil", 0.01, 1000.0),
            ("HO", "Heating Oil", 0.0001, 42000.0),
            ("6E", "Euro USD", 0.00005, 125000.0),
            ("6B", "British Pound USD", 0.0001, 62500.0),
            ("ZN", "US 10 year treasury", 0.015625, 1000.0),
            ("ZB", "US 30 year treasury", 0.03125, 1000.0),
            ("GC", "Gold", 0.1, 100.0),
            ("SI", "Silver", 0.005, 5000.0),
            ("ZC", "Corn", 0.25, 50.0),
            ("ZW", "Wheat", 0.25, 50.0),
        ] {
            registry.insert(ContractSpec::new(shortcode, name, tick_size, point_value));
        }
        registry
    }

    //adds or replaces a contract
    pub fn insert(&mut self, contract: ContractSpec) {
        self.contracts.insert(contract.shortcode.clone(), contract);
    }

    pub fn get(&self, shortcode: &str) -> Option<&ContractSpec> {
        self.contracts.get(shortcode)
    }

    pub fn shortcodes(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractSpec> {
        self.contracts.values()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

//pairs traded as a spread
pub fn default_pairs() -> Vec<(String, String)> {
    [
        ("ES", "NQ"),
        ("CL", "HO"),
        ("6E", "6B"),
        ("ZN", "ZB"),
        ("GC", "SI"),
        ("ZC", "ZW"),
    ]
    .iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect()
}

//primary/reference pairs for relative value, each pair in both directions
pub fn default_relative_pairs() -> Vec<(String, String)> {
    default_pairs()
        .into_iter()
        .flat_map(|(a, b)| [(a.clone(), b.clone()), (b, a)])
        .collect()
}
