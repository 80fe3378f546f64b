// CSV price files - one <SYMBOL>.csv per symbol
// Header row must name Date, Open and Close columns (any case, extra columns ignored)
// Example: "2024-01-02,187.15,185.64" or a yfinance export with "2024-01-02 00:00:00-05:00"

use super::{clip_to_range, PriceProvider};
use crate::error::ProviderError;
use crate::series::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read every bar from a price CSV file
pub fn read_price_csv(path: &Path) -> Result<PriceSeries, ProviderError> {
    let file = File::open(path)?;

    let source_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
        .to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| ProviderError::malformed(&source_name, e.to_string()))?
        .clone();

    let date_col = column(&headers, "date", &source_name)?;
    let open_col = column(&headers, "open", &source_name)?;
    let close_col = column(&headers, "close", &source_name)?;

    let mut bars = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        // +2 because: 1-indexed + header row
        let line = line_num + 2;

        let record = result.map_err(|e| {
            ProviderError::malformed(&source_name, format!("line {}: {}", line, e))
        })?;

        let date = record.get(date_col).unwrap_or("");
        // Keep the calendar part of timestamped exports
        let date = date.get(..10).unwrap_or(date);

        let open = parse_price(record.get(open_col), "Open", line, &source_name)?;
        let close = parse_price(record.get(close_col), "Close", line, &source_name)?;

        let bar = PriceBar::parse(date, open, close).map_err(|e| {
            ProviderError::malformed(&source_name, format!("line {}: {}", line, e))
        })?;

        bars.push(bar);
    }

    Ok(bars)
}

fn column(headers: &StringRecord, name: &str, source_name: &str) -> Result<usize, ProviderError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| ProviderError::malformed(source_name, format!("missing '{}' column", name)))
}

fn parse_price(
    value: Option<&str>,
    field: &str,
    line: usize,
    source_name: &str,
) -> Result<f64, ProviderError> {
    let raw = value.unwrap_or("");
    raw.parse::<f64>().map_err(|_| {
        ProviderError::malformed(
            source_name,
            format!("line {}: {} is not a number: '{}'", line, field, raw),
        )
    })
}

// ============================================================================
// PROVIDER
// ============================================================================

/// Serves symbols from a directory of price CSV files
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        CsvProvider {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File backing a symbol
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let no_data = || ProviderError::NoData {
            symbol: symbol.to_string(),
        };

        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.starts_with('.') {
            return Err(no_data());
        }

        let bars = match read_price_csv(&self.path_for(symbol)) {
            Err(ProviderError::Io(e)) if e.kind() == ErrorKind::NotFound => return Err(no_data()),
            other => other?,
        };

        clip_to_range(symbol, bars, start, end)
    }
}

// ============================================================================
// TESTS
// ============================================================================
