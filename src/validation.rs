// ✅ Request Validation - checks a calculator submission before simulating
// Field presence, ticker shape, amount bounds, frequency membership, date range sanity

use crate::error::RequestError;
use crate::plan::Frequency;
use crate::series::DATE_FORMAT;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest amount accepted per contribution
pub const MAX_AMOUNT: u32 = 1_000_000;

/// Shortest accepted date range, in days
pub const MIN_RANGE_DAYS: i64 = 7;

/// Longest accepted date range, in years
pub const MAX_RANGE_YEARS: u32 = 10;

const MAX_TICKER_LEN: usize = 15;

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// Calculator submission as received on the wire. Every field is optional
/// here so that a missing field is reported by the validator, not the decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub ticker: Option<String>,

    /// Number or numeric string
    #[serde(default)]
    pub amount: Option<Value>,

    #[serde(default)]
    pub frequency: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    /// Empty or missing means "today"
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A submission that passed every rule, with values normalized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRequest {
    /// Upper-cased ticker symbol
    pub symbol: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validate a submission. `today` bounds the end date and fills it when absent.
pub fn validate(request: &SubmitRequest, today: NaiveDate) -> Result<ValidatedRequest, RequestError> {
    let ticker = required_text(request.ticker.as_deref(), "ticker")?;
    let symbol = validate_ticker(ticker)?;

    let amount = match &request.amount {
        None | Some(Value::Null) => return Err(RequestError::MissingField { field: "amount" }),
        Some(value) => validate_amount(value)?,
    };

    let frequency = validate_frequency(required_text(request.frequency.as_deref(), "frequency")?)?;

    let start_date = parse_date(
        required_text(request.start_date.as_deref(), "start_date")?,
        "start_date",
    )?;

    let end_date = match request.end_date.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(text) => parse_date(text, "end_date")?,
    };

    validate_range(start_date, end_date, today)?;

    Ok(ValidatedRequest {
        symbol,
        amount,
        frequency,
        start_date,
        end_date,
    })
}

fn required_text<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RequestError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(RequestError::MissingField { field }),
    }
}

fn validate_ticker(ticker: &str) -> Result<String, RequestError> {
    let symbol = ticker.to_uppercase();

    if symbol.len() > MAX_TICKER_LEN {
        return Err(RequestError::InvalidTicker {
            value: symbol,
            reason: "too long",
        });
    }

    let mut chars = symbol.chars();
    if let Some(first) = chars.next() {
        if !(first.is_ascii_alphanumeric() || first == '^') {
            return Err(RequestError::InvalidTicker {
                value: symbol,
                reason: "must start with a letter, digit or '^'",
            });
        }
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '=' | '^')) {
        return Err(RequestError::InvalidTicker {
            value: symbol,
            reason: "contains unsupported characters",
        });
    }

    Ok(symbol)
}

fn validate_amount(value: &Value) -> Result<f64, RequestError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|a| a.is_finite())
    .ok_or_else(|| RequestError::InvalidAmount {
        value: value.to_string(),
    })?;

    if amount <= 0.0 {
        return Err(RequestError::NonPositiveAmount);
    }

    if amount > MAX_AMOUNT as f64 {
        return Err(RequestError::AmountTooLarge { max: MAX_AMOUNT });
    }

    Ok(amount)
}

fn validate_frequency(text: &str) -> Result<Frequency, RequestError> {
    text.parse::<Frequency>()
        .map_err(|_| RequestError::InvalidFrequency {
            value: text.to_lowercase(),
        })
}

fn parse_date(text: &str, field: &'static str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| RequestError::InvalidDate {
        field,
        value: text.to_string(),
    })
}

fn validate_range(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<(), RequestError> {
    if start > end {
        return Err(RequestError::StartAfterEnd);
    }

    if end > today {
        return Err(RequestError::EndInFuture { end });
    }

    if (end - start).num_days() < MIN_RANGE_DAYS {
        return Err(RequestError::RangeTooShort {
            min_days: MIN_RANGE_DAYS,
        });
    }

    let earliest = end
        .checked_sub_months(Months::new(MAX_RANGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    if start < earliest {
        return Err(RequestError::RangeTooLong {
            max_years: MAX_RANGE_YEARS,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
