// 💵 DCA Simulator - daily vs weekly vs monthly dollar-cost averaging
// Pure computation: no I/O, no logging, no shared state

use crate::error::SimulationError;
use crate::plan::{ContributionPlan, Frequency};
use crate::series::{normalize, PriceBar};
use serde::{Deserialize, Serialize};

/// Weekly cadence invests on every 5th bar by position, not by calendar week
pub const WEEKLY_STRIDE: usize = 5;

// ============================================================================
// SIMULATION RESULT
// ============================================================================

/// Outcome of one cadence over the whole series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    /// final_value - total_invested
    pub profit_loss: f64,

    /// Capital deployed across all investment events
    pub total_invested: f64,

    /// Number of investment events
    pub contributions: usize,

    /// Shares accumulated
    pub shares: f64,

    /// Shares valued at the last bar's close
    pub final_value: f64,
}

impl SimulationResult {
    /// Profit/loss as a percentage of capital deployed (0 when nothing was invested)
    pub fn return_pct(&self) -> f64 {
        if self.total_invested > 0.0 {
            self.profit_loss / self.total_invested * 100.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// SIMULATION REPORT
// ============================================================================

/// Results for all three cadences, serialized keyed by cadence name
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    pub daily: SimulationResult,
    pub weekly: SimulationResult,
    pub monthly: SimulationResult,
}

impl SimulationReport {
    pub fn get(&self, cadence: Frequency) -> &SimulationResult {
        match cadence {
            Frequency::Daily => &self.daily,
            Frequency::Weekly => &self.weekly,
            Frequency::Monthly => &self.monthly,
        }
    }

    /// Cadence with the highest profit/loss; ties go to the earlier of daily, weekly, monthly
    pub fn best(&self) -> Frequency {
        let mut best = Frequency::Daily;
        for cadence in Frequency::ALL {
            if self.get(cadence).profit_loss > self.get(best).profit_loss {
                best = cadence;
            }
        }
        best
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Simulate daily, weekly and monthly DCA over `series`.
///
/// The nominal amount is first scaled into a [`ContributionPlan`] so the three
/// cadences deploy comparable capital. `series` is borrowed; a sorted copy is
/// simulated. An empty series yields an all-zero report.
pub fn simulate(
    series: &[PriceBar],
    nominal_amount: f64,
    nominal_frequency: Frequency,
) -> Result<SimulationReport, SimulationError> {
    let plan = ContributionPlan::derive(nominal_amount, nominal_frequency)?;

    if series.is_empty() {
        return Ok(SimulationReport::default());
    }

    let sorted = normalize(series)?;

    Ok(SimulationReport {
        daily: run_cadence(&sorted, plan.daily_amount, Frequency::Daily)?,
        weekly: run_cadence(&sorted, plan.weekly_amount, Frequency::Weekly)?,
        monthly: run_cadence(&sorted, plan.monthly_amount, Frequency::Monthly)?,
    })
}

/// Simulate a single cadence with an already derived plan
pub fn simulate_cadence(
    series: &[PriceBar],
    plan: &ContributionPlan,
    cadence: Frequency,
) -> Result<SimulationResult, SimulationError> {
    let sorted = normalize(series)?;
    run_cadence(&sorted, plan.amount_for(cadence), cadence)
}

/// One pass over a validated, date-ascending series
fn run_cadence(
    series: &[PriceBar],
    amount: f64,
    cadence: Frequency,
) -> Result<SimulationResult, SimulationError> {
    let Some(last) = series.last() else {
        return Ok(SimulationResult::default());
    };

    let mut shares = 0.0;
    let mut contributions = 0usize;
    let mut current_month: Option<(i32, u32)> = None;

    for (position, bar) in series.iter().enumerate() {
        let invest = match cadence {
            Frequency::Daily => true,
            Frequency::Weekly => position % WEEKLY_STRIDE == 0,
            Frequency::Monthly => {
                let key = bar.month_key();
                if current_month != Some(key) {
                    current_month = Some(key);
                    true
                } else {
                    false
                }
            }
        };

        if invest {
            shares += amount / bar.open;
            contributions += 1;

            if !shares.is_finite() {
                return Err(SimulationError::data_integrity(
                    Some(bar.date),
                    format!("open price {} overflows the share count", bar.open),
                ));
            }
        }
    }

    let total_invested = amount * contributions as f64;
    let final_value = shares * last.close;

    if !final_value.is_finite() || !total_invested.is_finite() {
        return Err(SimulationError::data_integrity(
            Some(last.date),
            format!("close price {} overflows the position value", last.close),
        ));
    }

    Ok(SimulationResult {
        profit_loss: final_value - total_invested,
        total_invested,
        contributions,
        shares,
        final_value,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    /// Weekday bars from `start` to `end` inclusive with a gently rising price
    fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let mut bars = Vec::new();
        let mut date = start;
        let mut price = 100.0;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                bars.push(PriceBar::new(date, price, price + 0.5));
                price += 0.25;
            }
            date += Duration::days(1);
        }
        bars
    }

    #[test]
    fn test_empty_series_yields_zeros() {
        for frequency in Frequency::ALL {
            let report = simulate(&[], 100.0, frequency).unwrap();
            for cadence in Frequency::ALL {
                let result = report.get(cadence);
                assert_eq!(result.profit_loss, 0.0);
                assert_eq!(result.total_invested, 0.0);
                assert_eq!(result.contributions, 0);
            }
        }
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let bars = vec![PriceBar::new(day(2024, 1, 2), 10.0, 12.0)];
        assert!(matches!(
            simulate(&bars, 0.0, Frequency::Daily),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            simulate(&[], -5.0, Frequency::Daily),
            Err(SimulationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_bar_nominal_daily() {
        let bars = vec![PriceBar::new(day(2024, 1, 2), 10.0, 12.0)];
        let report = simulate(&bars, 100.0, Frequency::Daily).unwrap();

        assert_close(report.daily.shares, 10.0);
        assert_close(report.daily.final_value, 120.0);
        assert_close(report.daily.profit_loss, 20.0);
        assert_close(report.daily.total_invested, 100.0);

        assert_eq!(report.weekly.contributions, 1);
        assert_close(report.weekly.shares, 50.0);
        assert_close(report.weekly.final_value, 600.0);
        assert_close(report.weekly.total_invested, 500.0);
        assert_close(report.weekly.profit_loss, 100.0);

        assert_eq!(report.monthly.contributions, 1);
        assert_close(report.monthly.total_invested, 2100.0);
        assert_close(report.monthly.profit_loss, 420.0);
    }

    #[test]
    fn test_capital_deployed_is_comparable_over_a_year() {
        let bars = weekdays(day(2023, 1, 2), day(2023, 12, 29));
        assert_eq!(bars.len(), 260);

        let report = simulate(&bars, 100.0, Frequency::Monthly).unwrap();
        let monthly = report.monthly.total_invested;
        assert_close(monthly, 1200.0);

        for cadence in Frequency::ALL {
            let invested = report.get(cadence).total_invested;
            assert!(
                (invested - monthly).abs() / monthly < 0.1,
                "{} invested {} vs monthly {}",
                cadence,
                invested,
                monthly
            );
        }
    }

    #[test]
    fn test_monthly_invests_on_first_bar_of_each_month() {
        let mut bars: Vec<PriceBar> = (1..=21)
            .map(|d| PriceBar::new(day(2024, 1, d), 10.0, 10.0))
            .collect();
        bars.extend((1..=19).map(|d| PriceBar::new(day(2024, 2, d), 20.0, 20.0)));
        assert_eq!(bars.len(), 40);

        let report = simulate(&bars, 100.0, Frequency::Monthly).unwrap();

        assert_eq!(report.monthly.contributions, 2);
        // 10 shares in January, 5 in February
        assert_close(report.monthly.shares, 15.0);
        assert_close(report.monthly.total_invested, 200.0);
        assert_close(report.monthly.profit_loss, 100.0);
    }

    #[test]
    fn test_weekly_samples_by_position() {
        // Dates include a weekend and a holiday gap; only position matters
        let dates = [
            day(2024, 7, 1),
            day(2024, 7, 2),
            day(2024, 7, 3),
            day(2024, 7, 5),
            day(2024, 7, 6),
            day(2024, 7, 8),
            day(2024, 7, 9),
            day(2024, 7, 10),
            day(2024, 7, 11),
            day(2024, 7, 12),
            day(2024, 7, 15),
        ];
        let bars: Vec<PriceBar> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| PriceBar::new(*d, (i + 1) as f64, 10.0))
            .collect();

        let report = simulate(&bars, 30.0, Frequency::Weekly).unwrap();

        assert_eq!(report.weekly.contributions, 3);
        // Bought at positions 0, 5, 10 → opens 1, 6, 11
        assert_close(report.weekly.shares, 30.0 / 1.0 + 30.0 / 6.0 + 30.0 / 11.0);
        assert_close(report.weekly.total_invested, 90.0);
    }

    #[test]
    fn test_zero_open_is_data_integrity_error() {
        let bars = vec![
            PriceBar::new(day(2024, 1, 2), 10.0, 10.0),
            PriceBar::new(day(2024, 1, 3), 0.0, 10.0),
            PriceBar::new(day(2024, 1, 4), 10.0, 10.0),
        ];

        let err = simulate(&bars, 100.0, Frequency::Daily).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DataIntegrity { date: Some(d), .. } if d == day(2024, 1, 3)
        ));
    }

    #[test]
    fn test_overflowing_position_is_data_integrity_error() {
        // Passes the per-bar checks but 100 / MIN_POSITIVE is infinite
        let tiny_open = vec![PriceBar::new(day(2024, 1, 2), f64::MIN_POSITIVE, 1e308)];
        let err = simulate(&tiny_open, 100.0, Frequency::Daily).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DataIntegrity { date: Some(d), .. } if d == day(2024, 1, 2)
        ));

        // Finite share count, infinite valuation
        let huge_close = vec![
            PriceBar::new(day(2024, 1, 2), 1e-300, 1.0),
            PriceBar::new(day(2024, 1, 3), 1.0, 1e300),
        ];
        let err = simulate(&huge_close, 100.0, Frequency::Daily).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DataIntegrity { date: Some(d), .. } if d == day(2024, 1, 3)
        ));
    }

    #[test]
    fn test_unsorted_input_matches_sorted_and_is_not_mutated() {
        let sorted = weekdays(day(2024, 3, 1), day(2024, 4, 30));
        let mut shuffled = sorted.clone();
        shuffled.reverse();
        shuffled.swap(3, 17);
        let before = shuffled.clone();

        let expected = simulate(&sorted, 50.0, Frequency::Weekly).unwrap();
        let actual = simulate(&shuffled, 50.0, Frequency::Weekly).unwrap();

        assert_eq!(expected, actual);
        assert_eq!(shuffled, before);
    }

    #[test]
    fn test_month_key_includes_year() {
        // Same month number a year apart with no bars in between
        let bars = vec![
            PriceBar::new(day(2023, 1, 10), 10.0, 10.0),
            PriceBar::new(day(2024, 1, 10), 20.0, 20.0),
        ];

        let report = simulate(&bars, 100.0, Frequency::Monthly).unwrap();
        assert_eq!(report.monthly.contributions, 2);
    }

    #[test]
    fn test_year_boundary_months() {
        let bars = vec![
            PriceBar::new(day(2023, 12, 1), 10.0, 10.0),
            PriceBar::new(day(2023, 12, 15), 10.0, 10.0),
            PriceBar::new(day(2024, 1, 2), 10.0, 10.0),
            PriceBar::new(day(2024, 1, 20), 10.0, 10.0),
            PriceBar::new(day(2024, 12, 2), 10.0, 10.0),
        ];

        let report = simulate(&bars, 100.0, Frequency::Monthly).unwrap();
        assert_eq!(report.monthly.contributions, 3);
    }

    #[test]
    fn test_simulate_cadence_matches_full_report() {
        let bars = weekdays(day(2024, 1, 1), day(2024, 2, 29));
        let plan = ContributionPlan::derive(20.0, Frequency::Daily).unwrap();
        let report = simulate(&bars, 20.0, Frequency::Daily).unwrap();

        for cadence in Frequency::ALL {
            let single = simulate_cadence(&bars, &plan, cadence).unwrap();
            assert_eq!(&single, report.get(cadence));
        }
    }

    #[test]
    fn test_best_and_return_pct() {
        let report = SimulationReport {
            daily: SimulationResult {
                profit_loss: 5.0,
                total_invested: 100.0,
                ..Default::default()
            },
            weekly: SimulationResult {
                profit_loss: 12.0,
                total_invested: 120.0,
                ..Default::default()
            },
            monthly: SimulationResult {
                profit_loss: 12.0,
                total_invested: 100.0,
                ..Default::default()
            },
        };

        assert_eq!(report.best(), Frequency::Weekly);
        assert_close(report.weekly.return_pct(), 10.0);
        assert_eq!(SimulationResult::default().return_pct(), 0.0);
    }

    #[test]
    fn test_report_serializes_keyed_by_cadence() {
        let bars = vec![PriceBar::new(day(2024, 1, 2), 10.0, 12.0)];
        let report = simulate(&bars, 100.0, Frequency::Daily).unwrap();
        let value = serde_json::to_value(report).unwrap();

        for key in ["daily", "weekly", "monthly"] {
            assert!(value[key]["profit_loss"].is_number());
            assert!(value[key]["total_invested"].is_number());
        }
    }
}
