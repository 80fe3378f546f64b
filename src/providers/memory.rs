// In-memory provider for tests and offline demos

use super::{clip_to_range, PriceProvider};
use crate::error::ProviderError;
use crate::series::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    series: HashMap<String, PriceSeries>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bars for a symbol (symbols are matched upper-cased)
    pub fn with_series(mut self, symbol: &str, bars: PriceSeries) -> Self {
        self.series.insert(symbol.to_uppercase(), bars);
        self
    }
}

impl PriceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let bars = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or_else(|| ProviderError::NoData {
                symbol: symbol.to_string(),
            })?;

        clip_to_range(symbol, bars.iter().copied(), start, end)
    }
}
