//! Form validation
//!
//! The birth date check runs in three steps:
//!
//! 1. pattern: `MM/DD/YYYY`, month 01-12, day 01-31
//! 2. build the date with roll-over (02/30 becomes 03/01 or 03/02) and reject
//!    anything after today
//! 3. require the built date to still carry the typed month and day, which
//!    catches the roll-over from step 2

use chrono::{Datelike, Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::{Field, ValidationError};
use crate::expectancy::{CountryCode, Gender};

lazy_static! {
    static ref BIRTH_DATE_PATTERN: Regex =
        Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/([0-9]{4})$").unwrap();
}

/// Field values exactly as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission {
    pub gender: String,
    pub birth_date: String,
    pub country: String,
}

impl RawSubmission {
    pub fn new(
        gender: impl Into<String>,
        birth_date: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            gender: gender.into(),
            birth_date: birth_date.into(),
            country: country.into(),
        }
    }

    /// Validate every field against `today`
    pub fn validate(&self, today: NaiveDate) -> Result<Submission, ValidationError> {
        let gender = self.gender.trim();
        let birth_date = self.birth_date.trim();
        let country = self.country.trim();

        if gender.is_empty() {
            return Err(ValidationError::MissingField(Field::Gender));
        }
        if birth_date.is_empty() {
            return Err(ValidationError::MissingField(Field::BirthDate));
        }
        if country.is_empty() {
            return Err(ValidationError::MissingField(Field::Country));
        }

        let gender =
            Gender::parse(gender).ok_or_else(|| ValidationError::UnknownGender(gender.to_string()))?;
        let country = CountryCode::parse(country)
            .ok_or_else(|| ValidationError::InvalidCountry(country.to_string()))?;
        let birthdate = validate_birth_date(birth_date, today)?;

        Ok(Submission {
            gender,
            birthdate,
            country,
        })
    }
}

/// Validated form input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub country: CountryCode,
}

/// Parse and check a `MM/DD/YYYY` birth date
pub fn validate_birth_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    let invalid_format = || ValidationError::InvalidFormat(input.to_string());

    let caps = BIRTH_DATE_PATTERN
        .captures(input)
        .ok_or_else(invalid_format)?;
    let month: u32 = caps[1].parse().map_err(|_| invalid_format())?;
    let day: u32 = caps[2].parse().map_err(|_| invalid_format())?;
    let year: i32 = caps[3].parse().map_err(|_| invalid_format())?;

    let date = rolled_date(year, month, day)
        .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))?;

    if date > today {
        return Err(ValidationError::FutureDate(input.to_string()));
    }

    if date.month() != month || date.day() != day {
        return Err(ValidationError::InvalidDate(input.to_string()));
    }

    Ok(date)
}

/// Day `day` counted from the first of `month`, spilling into later months
fn rolled_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

/// Long form used to echo the chosen date, e.g. `January 1, 1990`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
