pub mod contract;
pub mod registry;
pub mod synthetic;

pub use contract::ContractSpec;
pub use registry::{default_pairs, default_relative_pairs, ContractRegistry};
pub use synthetic::{SpreadKind, SyntheticContract};
