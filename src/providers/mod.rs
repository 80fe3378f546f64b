// Market Data Providers
// Each provider turns (symbol, date range) into a daily PriceSeries
//
// Range semantics: start inclusive, end exclusive.

pub mod csv_file;
pub mod memory;
#[cfg(feature = "server")]
pub mod yahoo;

pub use self::csv_file::{read_price_csv, CsvProvider};
pub use self::memory::StaticProvider;
#[cfg(feature = "server")]
pub use self::yahoo::{YahooConfig, YahooProvider};

use crate::error::ProviderError;
use crate::series::{PriceBar, PriceSeries};
use chrono::NaiveDate;

/// Source of daily open/close bars for a symbol
pub trait PriceProvider: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Daily bars for `symbol` with `start <= date < end`
    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;
}

/// Keep bars inside [start, end) and fail with NoData when nothing is left
pub(crate) fn clip_to_range(
    symbol: &str,
    bars: impl IntoIterator<Item = PriceBar>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, ProviderError> {
    let clipped: PriceSeries = bars
        .into_iter()
        .filter(|bar| bar.date >= start && bar.date < end)
        .collect();

    if clipped.is_empty() {
        return Err(ProviderError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(clipped)
}
