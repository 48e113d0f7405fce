use crate::data::bar::Bar;
use crate::data::series::MarketSeries;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

//open/high/low are optional, a missing one falls back to the close
#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    close: f64,
}

//parses yyyy-mm-dd, mm/dd/yyyy or an rfc3339 timestamp
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Ok(date);
    }
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Unrecognised date '{}'", raw))?;
    Ok(timestamp.date_naive())
}

//loads daily bars for one instrument from a csv file
pub fn load_series<P: AsRef<Path>>(path: P, shortcode: &str) -> Result<MarketSeries> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let series = read_series(reader, shortcode)
        .with_context(|| format!("Failed to load {} from {:?}", shortcode, path))?;

    debug!(
        shortcode,
        bars = series.len(),
        path = %path.display(),
        "loaded market data"
    );

    Ok(series)
}

//reads bars from any csv source, header names are matched case-insensitively
pub fn read_series<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    shortcode: &str,
) -> Result<MarketSeries> {
    let headers: StringRecord = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();
    reader.set_headers(headers);

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = parse_date(&record.date)
            .context(format!("Bad date at line {}", index + 2))?;

        let bar = match (record.open, record.high, record.low) {
            (None, None, None) => Bar::from_close(date, record.close),
            (open, high, low) => Bar::new(
                date,
                open.unwrap_or(record.close),
                high.unwrap_or(record.close),
                low.unwrap_or(record.close),
                record.close,
            )
            .context(format!("Invalid bar at line {}", index + 2))?,
        };

        bars.push(bar);
    }

    Ok(MarketSeries::new(shortcode, bars))
}
