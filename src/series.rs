// 📈 Price Series - one bar per trading day
// Data model handed from market-data providers to the simulator

use crate::error::SimulationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Date format used on the wire and in CSV price files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// PRICE BAR
// ============================================================================

/// One trading day's prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Calendar date of the session (no time-of-day)
    pub date: NaiveDate,

    /// Opening price, used as the purchase price
    pub open: f64,

    /// Closing price, used to value the position
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        PriceBar { date, open, close }
    }

    /// Build a bar from textual date as delivered by a data source
    pub fn parse(date: &str, open: f64, close: f64) -> Result<Self, SimulationError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
            SimulationError::data_integrity(None, format!("unparseable bar date '{}': {}", date, e))
        })?;

        Ok(PriceBar::new(parsed, open, close))
    }

    /// (year, month) key used to detect month transitions
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }

    /// Check the price invariants the simulator depends on
    pub fn check(&self) -> Result<(), SimulationError> {
        if !self.open.is_finite() || self.open <= 0.0 {
            return Err(SimulationError::data_integrity(
                Some(self.date),
                format!("open price must be positive, got {}", self.open),
            ));
        }

        if !self.close.is_finite() || self.close <= 0.0 {
            return Err(SimulationError::data_integrity(
                Some(self.date),
                format!("close price must be positive, got {}", self.close),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// PRICE SERIES
// ============================================================================

/// Chronological daily bars for a single symbol
pub type PriceSeries = Vec<PriceBar>;

/// Validate every bar and return a copy sorted ascending by date.
///
/// The input is never reordered in place; providers are not trusted to
/// deliver sorted data. Two bars on the same date are rejected.
pub fn normalize(series: &[PriceBar]) -> Result<PriceSeries, SimulationError> {
    let mut seen = HashSet::with_capacity(series.len());

    for bar in series {
        bar.check()?;
        if !seen.insert(bar.date) {
            return Err(SimulationError::data_integrity(
                Some(bar.date),
                "duplicate bar for the same date",
            ));
        }
    }

    let mut sorted = series.to_vec();
    sorted.sort_by_key(|bar| bar.date);
    Ok(sorted)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_bar() {
        let bar = PriceBar::parse("2024-01-02", 185.5, 187.1).unwrap();
        assert_eq!(bar.date, day(2024, 1, 2));
        assert_eq!(bar.month_key(), (2024, 1));
    }

    #[test]
    fn test_parse_bar_rejects_bad_date() {
        let err = PriceBar::parse("01/02/2024", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, SimulationError::DataIntegrity { date: None, .. }));
    }

    #[test]
    fn test_check_rejects_non_positive_prices() {
        assert!(PriceBar::new(day(2024, 1, 2), 0.0, 1.0).check().is_err());
        assert!(PriceBar::new(day(2024, 1, 2), -3.0, 1.0).check().is_err());
        assert!(PriceBar::new(day(2024, 1, 2), f64::NAN, 1.0).check().is_err());
        assert!(PriceBar::new(day(2024, 1, 2), 1.0, 0.0).check().is_err());
        assert!(PriceBar::new(day(2024, 1, 2), 1.0, 2.0).check().is_ok());
    }

    #[test]
    fn test_normalize_sorts_copy() {
        let series = vec![
            PriceBar::new(day(2024, 1, 4), 3.0, 3.0),
            PriceBar::new(day(2024, 1, 2), 1.0, 1.0),
            PriceBar::new(day(2024, 1, 3), 2.0, 2.0),
        ];

        let sorted = normalize(&series).unwrap();

        let dates: Vec<NaiveDate> = sorted.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(2024, 1, 2), day(2024, 1, 3), day(2024, 1, 4)]);
        // Caller's series keeps its order
        assert_eq!(series[0].date, day(2024, 1, 4));
    }

    #[test]
    fn test_normalize_rejects_duplicate_dates() {
        let series = vec![
            PriceBar::new(day(2024, 1, 2), 1.0, 1.0),
            PriceBar::new(day(2024, 1, 2), 1.5, 1.5),
        ];

        let err = normalize(&series).unwrap_err();
        assert_eq!(
            err,
            SimulationError::data_integrity(Some(day(2024, 1, 2)), "duplicate bar for the same date")
        );
    }
}
