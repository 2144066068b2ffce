//! # Lifeweeks
//!
//! Look up a life expectancy by country and gender, then show how much of it
//! has been lived: percentages, whole weeks, and a donut chart whose caption
//! alternates between the lived and remaining share.
//!
//! ## Modules
//!
//! - [`expectancy`]: life expectancy lookup (static table behind an async trait)
//! - [`store`]: publish/subscribe state store
//! - [`input`]: form validation and submission
//! - [`metrics`]: derived percentages and week counts
//! - [`render`]: store-driven visualization and the terminal surface
//! - [`messages`]: inspirational message board
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifeweeks::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = AppStore::empty();
//!     let collector = InputCollector::new(Arc::new(StaticTable::new()), store.clone());
//!
//!     let raw = RawSubmission::new("female", "01/01/1990", "USA");
//!     let today = chrono::Local::now().date_naive();
//!     collector.submit(&raw, today).await?;
//!
//!     let now = chrono::Local::now().naive_local();
//!     if let Some(metrics) = DerivedMetrics::from_state(&store.get_state(), now) {
//!         println!("{}% lived, {} weeks left", metrics.used_percentage, metrics.weeks_remaining);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod expectancy;
pub mod input;
pub mod messages;
pub mod metrics;
pub mod render;
pub mod store;

pub use expectancy::{
    CountryCode, CountryEntry, Gender, LifeExpectancySource, LookupError, LookupResult,
    StaticTable,
};

pub use store::{AppState, AppStore, Merge, StatePatch, Store, Subscription};

pub use input::{
    format_long_date, validate_birth_date, Accepted, Field, InputCollector, RawSubmission,
    SubmitError, Submission, ValidationError,
};

pub use metrics::{compute_metrics, DerivedMetrics, YearStatistics, WEEKS_PER_YEAR};

pub use render::{
    ArcSegment, Caption, CaptionCycle, CaptionLines, ChartSurface, Clock, DonutLayout,
    FixedClock, Label, RenderOutcome, Size, Slice, SystemClock, TextGrid, TextPanel,
    Visualization,
};

pub use messages::MessageBoard;

pub use config::{ChartConfig, Config, ConfigError, DisplayConfig, LoggingConfig};
