//! Derived-Metrics Calculator
//!
//! - **calculator**: weeks and percentages driven by the donut chart
//! - **statistics**: the year-based summary panel

mod calculator;
mod statistics;

pub use calculator::{
    completed_years, compute_metrics, round_half_up, DerivedMetrics, WEEKS_PER_YEAR,
};
pub use statistics::YearStatistics;
