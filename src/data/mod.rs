pub mod bar;
pub mod loader;
pub mod series;

pub use bar::{Bar, BarError};
pub use loader::{load_series, parse_date, read_series};
pub use series::MarketSeries;
