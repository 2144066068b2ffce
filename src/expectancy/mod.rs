//! Life Expectancy Lookup
//!
//! Maps a `(country, gender)` pair to an expected lifespan in years.
//!
//! - **types**: `Gender` and `CountryCode` keys
//! - **table**: the built-in fact table
//! - **error**: lookup errors
//!
//! The lookup is asynchronous so that a networked source can replace the
//! static table without touching callers.

mod error;
mod table;
mod types;

pub use error::{LookupError, LookupResult};
pub use table::{CountryEntry, StaticTable};
pub use types::{CountryCode, Gender};

use async_trait::async_trait;

/// Anything that can answer a life expectancy query
#[async_trait]
pub trait LifeExpectancySource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Expected lifespan in years
    async fn life_expectancy(&self, country: &CountryCode, gender: Gender) -> LookupResult<f64>;
}
