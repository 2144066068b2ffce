//! Lookup error types

use thiserror::Error;

/// Errors that can occur while looking up a life expectancy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Country or gender was empty
    #[error("Country and gender must be provided")]
    MissingInput,

    /// No entry for this country/gender pair
    #[error("No life expectancy data for {country} ({gender})")]
    NotFound { country: String, gender: String },

    /// The backing source failed
    #[error("Lookup failed: {0}")]
    Source(String),
}

/// Result type alias for lookups
pub type LookupResult<T> = Result<T, LookupError>;
