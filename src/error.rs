// ⚠️ Error Types
// Typed failures for the simulator, the request validator and price providers

use chrono::NaiveDate;
use thiserror::Error;

// ============================================================================
// SIMULATION ERRORS
// ============================================================================

/// Failures raised by the DCA simulator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Caller passed an amount or frequency the engine cannot work with
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A price bar would corrupt the share accumulation
    #[error("data integrity error{}: {reason}", on_date(.date))]
    DataIntegrity {
        date: Option<NaiveDate>,
        reason: String,
    },
}

fn on_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| format!(" on {}", d)).unwrap_or_default()
}

impl SimulationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SimulationError::InvalidInput(message.into())
    }

    pub fn data_integrity(date: Option<NaiveDate>, reason: impl Into<String>) -> Self {
        SimulationError::DataIntegrity {
            date,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// REQUEST ERRORS
// ============================================================================

/// One variant per validation rule applied to an incoming request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("invalid ticker '{value}': {reason}")]
    InvalidTicker { value: String, reason: &'static str },

    #[error("amount must be a number: '{value}'")]
    InvalidAmount { value: String },
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount must not exceed {max}")]
    AmountTooLarge { max: u32 },

    #[error("invalid frequency '{value}', expected one of daily, weekly, monthly")]
    InvalidFrequency { value: String },

    #[error("{field} must be a date in YYYY-MM-DD format: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("start_date must not be after end_date")]
    StartAfterEnd,
    #[error("end_date {end} is in the future")]
    EndInFuture { end: NaiveDate },
    #[error("date range must span at least {min_days} days")]
    RangeTooShort { min_days: i64 },
    #[error("date range must not exceed {max_years} years")]
    RangeTooLong { max_years: u32 },
}

// ============================================================================
// PROVIDER ERRORS
// ============================================================================

/// Failures while retrieving a price series from a market-data source.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no price data found for symbol '{symbol}'")]
    NoData { symbol: String },

    #[error("market data request failed: {0}")]
    Http(String),

    #[error("malformed price data in {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    #[error("failed to read price data: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Malformed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
