// Yahoo Finance chart API (v8), daily interval
//
// GET {base_url}/v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d
// Unknown symbols come back as HTTP 404 with chart.error.code = "Not Found".

use super::{clip_to_range, PriceProvider};
use crate::error::ProviderError;
use crate::series::{PriceBar, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        YahooConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("dca-compare/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Convert a chart response body into bars within [start, end)
fn parse_chart(
    symbol: &str,
    body: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, ProviderError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed("yahoo chart response", e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        return Err(ProviderError::Http(format!("{}: {}", error.code, error.description)));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(ProviderError::NoData {
            symbol: symbol.to_string(),
        });
    };

    let offset = result.meta.gmtoffset;
    let quote = result.indicators.quote.into_iter().next();
    let (opens, closes) = quote.map(|q| (q.open, q.close)).unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        // Null prices mark sessions without trades
        let (Some(Some(open)), Some(Some(close))) = (opens.get(i), closes.get(i)) else {
            continue;
        };

        let date = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                ProviderError::malformed("yahoo chart response", format!("bad timestamp {}", ts))
            })?;

        bars.push(PriceBar::new(date, *open, *close));
    }

    clip_to_range(symbol, bars, start, end)
}

// ============================================================================
// PROVIDER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct YahooProvider {
    config: YahooConfig,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Self {
        YahooProvider { config }
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(symbol),
            period1,
            period2
        )
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    /// Blocking; call from a blocking thread when inside an async runtime
    fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(symbol, start, end);
        debug!(%symbol, %url, "requesting yahoo chart");

        // Built per call so the client never outlives the blocking thread
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        // 404 still carries a chart.error body worth reading
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            warn!(%symbol, %status, "yahoo chart request failed");
            return Err(ProviderError::Http(format!("upstream returned {}", status)));
        }

        parse_chart(symbol, &body, start, end)
    }
}

// ============================================================================
// TESTS
// ============================================================================
