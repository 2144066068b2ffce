//! Year-based statistics panel
//!
//! Coarser companion to [`DerivedMetrics`](super::DerivedMetrics): age is the
//! plain calendar-year difference and percentages keep one decimal.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::store::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStatistics {
    pub life_expectancy: f64,
    /// `today.year - birth.year`, birthday ignored
    pub years_lived: i32,
    pub lived_percentage: f64,
    pub remaining_percentage: f64,
}

impl YearStatistics {
    pub fn compute(state: &AppState, today: NaiveDate) -> Option<Self> {
        let (life_expectancy, birthdate) = state.inputs()?;
        let years_lived = today.year() - birthdate.year();
        let lived_percentage = f64::from(years_lived) / life_expectancy * 100.0;

        Some(Self {
            life_expectancy,
            years_lived,
            lived_percentage,
            remaining_percentage: 100.0 - lived_percentage,
        })
    }

    /// e.g. `81.1 years`
    pub fn life_expectancy_label(&self) -> String {
        format!("{:.1} years", self.life_expectancy)
    }

    pub fn lived_label(&self) -> String {
        format!("{:.1}%", self.lived_percentage)
    }

    pub fn remaining_label(&self) -> String {
        format!("{:.1}%", self.remaining_percentage)
    }
}

impl std::fmt::Display for YearStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Life expectancy {} | {} of life lived | {} remaining",
            self.life_expectancy_label(),
            self.lived_label(),
            self.remaining_label()
        )
    }
}
