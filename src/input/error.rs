//! Input error types
//!
//! Validation errors are shown inline next to the form; lookup errors are
//! shown as a blocking alert. Neither mutates the store.

use thiserror::Error;

use crate::expectancy::LookupError;

/// Form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Gender,
    BirthDate,
    Country,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Gender => write!(f, "gender"),
            Field::BirthDate => write!(f, "birth date"),
            Field::Country => write!(f, "country"),
        }
    }
}

/// Rejected form input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in all fields: {0} is missing")]
    MissingField(Field),

    /// Not `MM/DD/YYYY`, or month/day out of range
    #[error("Birth date must use the MM/DD/YYYY format, got '{0}'")]
    InvalidFormat(String),

    #[error("Birth date {0} is in the future")]
    FutureDate(String),

    /// Day does not exist in that month, e.g. 02/30
    #[error("{0} is not a valid calendar date")]
    InvalidDate(String),

    #[error("Unknown gender '{0}', expected 'male' or 'female'")]
    UnknownGender(String),

    #[error("Country must be a three-letter ISO code, got '{0}'")]
    InvalidCountry(String),
}

/// Errors returned by [`InputCollector::submit`](super::InputCollector::submit)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unable to process data: {0}")]
    Lookup(#[from] LookupError),

    /// Another submission is still waiting on its lookup
    #[error("A submission is already in progress")]
    InFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::MissingField(Field::BirthDate);
        assert_eq!(err.to_string(), "Please fill in all fields: birth date is missing");

        let err = ValidationError::InvalidDate("02/30/2020".to_string());
        assert_eq!(err.to_string(), "02/30/2020 is not a valid calendar date");
    }

    #[test]
    fn test_submit_error_wraps() {
        let err: SubmitError = LookupError::MissingInput.into();
        assert!(matches!(err, SubmitError::Lookup(LookupError::MissingInput)));
        assert_eq!(
            err.to_string(),
            "Unable to process data: Country and gender must be provided"
        );

        let err: SubmitError = ValidationError::FutureDate("01/01/2999".to_string()).into();
        assert_eq!(err.to_string(), "Birth date 01/01/2999 is in the future");
    }
}
