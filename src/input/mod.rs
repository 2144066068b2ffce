//! Input Collector
//!
//! Everything between the raw form fields and the store:
//!
//! - **validate**: field and birth date rules
//! - **collector**: lookup + store write, with an in-flight latch
//! - **error**: validation and submission errors

mod collector;
mod error;
mod validate;

pub use collector::{Accepted, InputCollector};
pub use error::{Field, SubmitError, ValidationError};
pub use validate::{format_long_date, validate_birth_date, RawSubmission, Submission};
