//! Derived metrics
//!
//! Pure arithmetic over `(life_expectancy, birthdate, now)`. Nothing here is
//! stored; the renderer recomputes on every state change and resize.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::store::AppState;

/// Average weeks per year, leap years included
pub const WEEKS_PER_YEAR: f64 = 52.1429;

const MILLIS_PER_WEEK: i64 = 7 * 24 * 60 * 60 * 1000;

/// Figures shown by the visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    /// Completed years of age
    pub age_years: i32,
    /// Share of life expectancy lived, rounded half-up
    pub used_percentage: i64,
    /// `100 - used_percentage`; negative once past life expectancy
    pub remaining_percentage: i64,
    /// Whole 7-day periods since birth
    pub weeks_lived: i64,
    pub total_weeks: i64,
    /// `total_weeks - weeks_lived`; may be negative
    pub weeks_remaining: i64,
}

impl DerivedMetrics {
    /// Compute from store state, or `None` while an input is missing
    pub fn from_state(state: &AppState, now: NaiveDateTime) -> Option<Self> {
        let (life_expectancy, birthdate) = state.inputs()?;
        Some(compute_metrics(life_expectancy, birthdate, now))
    }

    /// Age has passed the life expectancy
    pub fn is_overdue(&self) -> bool {
        self.remaining_percentage < 0
    }
}

/// Compute every derived figure
///
/// Callers must check that both inputs exist first; see
/// [`DerivedMetrics::from_state`].
pub fn compute_metrics(
    life_expectancy: f64,
    birthdate: NaiveDate,
    now: NaiveDateTime,
) -> DerivedMetrics {
    let age_years = completed_years(birthdate, now.date());
    let used_percentage = round_half_up(f64::from(age_years) / life_expectancy * 100.0);

    let elapsed = now - birthdate.and_time(NaiveTime::MIN);
    let weeks_lived = elapsed.num_milliseconds().div_euclid(MILLIS_PER_WEEK);
    let total_weeks = (life_expectancy * WEEKS_PER_YEAR).floor() as i64;

    DerivedMetrics {
        age_years,
        used_percentage,
        remaining_percentage: 100 - used_percentage,
        weeks_lived,
        total_weeks,
        weeks_remaining: total_weeks - weeks_lived,
    }
}

/// Age in completed years on `today`
pub fn completed_years(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// Round to the nearest integer, ties toward positive infinity
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_reference_scenario() {
        let metrics = compute_metrics(80.0, date(1990, 1, 1), midnight(2024, 1, 1));
        assert_eq!(metrics.age_years, 34);
        assert_eq!(metrics.used_percentage, 43);
        assert_eq!(metrics.remaining_percentage, 57);
        // 12418 days between the two dates
        assert_eq!(metrics.weeks_lived, 1774);
        assert_eq!(metrics.total_weeks, 4171);
        assert_eq!(metrics.weeks_remaining, 4171 - 1774);
    }

    #[test]
    fn test_age_before_birthday_in_year() {
        assert_eq!(completed_years(date(1990, 6, 15), date(2024, 6, 14)), 33);
        assert_eq!(completed_years(date(1990, 6, 15), date(2024, 6, 15)), 34);
        assert_eq!(completed_years(date(1990, 6, 15), date(2024, 7, 1)), 34);
        assert_eq!(completed_years(date(1990, 12, 31), date(2024, 1, 1)), 33);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(completed_years(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(completed_years(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(42.5), 43);
        assert_eq!(round_half_up(42.49), 42);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-1.5), -1);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for (years, age) in [(76.1, 0), (81.1, 40), (87.5, 87), (79.4, 95)] {
            let birth = date(1920, 3, 10);
            let now = midnight(1920 + age, 3, 10);
            let metrics = compute_metrics(years, birth, now);
            assert_eq!(metrics.used_percentage + metrics.remaining_percentage, 100);
        }
    }

    #[test]
    fn test_overdue_goes_negative() {
        let metrics = compute_metrics(76.1, date(1920, 1, 1), midnight(2020, 1, 1));
        assert_eq!(metrics.age_years, 100);
        assert_eq!(metrics.used_percentage, 131);
        assert_eq!(metrics.remaining_percentage, -31);
        assert!(metrics.weeks_remaining < 0);
        assert!(metrics.is_overdue());
    }

    #[test]
    fn test_total_weeks_constant() {
        let metrics = compute_metrics(81.1, date(2000, 1, 1), midnight(2000, 1, 1));
        assert_eq!(metrics.total_weeks, (81.1 * 52.1429_f64).floor() as i64);
        assert_eq!(metrics.total_weeks, 4228);
        assert_eq!(metrics.weeks_lived, 0);
        assert_eq!(metrics.weeks_remaining, metrics.total_weeks);
    }

    #[test]
    fn test_weeks_lived_counts_whole_weeks() {
        let birth = date(2024, 1, 1);
        assert_eq!(compute_metrics(80.0, birth, midnight(2024, 1, 7)).weeks_lived, 0);
        assert_eq!(compute_metrics(80.0, birth, midnight(2024, 1, 8)).weeks_lived, 1);

        let almost = date(2024, 1, 14).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(compute_metrics(80.0, birth, almost).weeks_lived, 1);
    }

    #[test]
    fn test_pure_and_repeatable() {
        let now = date(2025, 3, 3).and_hms_opt(14, 30, 0).unwrap();
        let a = compute_metrics(83.1, date(1985, 7, 20), now);
        let b = compute_metrics(83.1, date(1985, 7, 20), now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_state_requires_both_fields() {
        let now = midnight(2024, 1, 1);
        let mut state = AppState::default();
        assert!(DerivedMetrics::from_state(&state, now).is_none());

        state.life_expectancy = Some(80.0);
        assert!(DerivedMetrics::from_state(&state, now).is_none());

        state.birthdate = Some(date(1990, 1, 1));
        let metrics = DerivedMetrics::from_state(&state, now).unwrap();
        assert_eq!(metrics.used_percentage, 43);
    }
}
