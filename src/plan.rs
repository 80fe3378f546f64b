// 🗓️ Contribution Plan - nominal amount → per-cadence amounts
// Keeps capital deployed comparable across daily, weekly and monthly investing

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Approximate number of trading days in a month
pub const TRADING_DAYS_PER_MONTH: f64 = 21.0;

/// Trading days in a week
pub const TRADING_DAYS_PER_WEEK: f64 = 5.0;

/// Weeks per month used for weekly ↔ monthly conversion.
/// Deliberately 4 rather than 21/5.
pub const WEEKS_PER_MONTH: f64 = 4.0;

// ============================================================================
// FREQUENCY
// ============================================================================

/// Investment cadence, used both for the nominal request and for each simulated strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// All cadences in report order
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Human-readable label for tables and charts
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(SimulationError::invalid_input(format!(
                "unknown frequency '{}', expected daily, weekly or monthly",
                other
            ))),
        }
    }
}

// ============================================================================
// CONTRIBUTION PLAN
// ============================================================================

/// Amount invested per event for each cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub daily_amount: f64,
    pub weekly_amount: f64,
    pub monthly_amount: f64,
}

impl ContributionPlan {
    /// Derive all three amounts from the nominal (amount, frequency) pair.
    ///
    /// | target  | nominal daily | nominal weekly | nominal monthly |
    /// |---------|---------------|----------------|-----------------|
    /// | daily   | amount        | amount / 5     | amount / 21     |
    /// | weekly  | amount × 5    | amount         | amount / 4      |
    /// | monthly | amount × 21   | amount × 4     | amount          |
    pub fn derive(amount: f64, frequency: Frequency) -> Result<Self, SimulationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SimulationError::invalid_input(format!(
                "investment amount must be a positive number, got {}",
                amount
            )));
        }

        let plan = match frequency {
            Frequency::Daily => ContributionPlan {
                daily_amount: amount,
                weekly_amount: amount * TRADING_DAYS_PER_WEEK,
                monthly_amount: amount * TRADING_DAYS_PER_MONTH,
            },
            Frequency::Weekly => ContributionPlan {
                daily_amount: amount / TRADING_DAYS_PER_WEEK,
                weekly_amount: amount,
                monthly_amount: amount * WEEKS_PER_MONTH,
            },
            Frequency::Monthly => ContributionPlan {
                daily_amount: amount / TRADING_DAYS_PER_MONTH,
                weekly_amount: amount / WEEKS_PER_MONTH,
                monthly_amount: amount,
            },
        };

        Ok(plan)
    }

    /// Amount invested on each event of the given cadence
    pub fn amount_for(&self, cadence: Frequency) -> f64 {
        match cadence {
            Frequency::Daily => self.daily_amount,
            Frequency::Weekly => self.weekly_amount,
            Frequency::Monthly => self.monthly_amount,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
