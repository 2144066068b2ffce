//! Static life expectancy table
//!
//! Five countries, two genders, values in years. Loaded at compile time and
//! never mutated.

use async_trait::async_trait;

use super::{CountryCode, Gender, LifeExpectancySource, LookupError, LookupResult};

/// One row of the fact table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub male: f64,
    pub female: f64,
}

impl CountryEntry {
    pub fn years(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

const ENTRIES: [CountryEntry; 5] = [
    CountryEntry { code: "USA", name: "United States", male: 76.1, female: 81.1 },
    CountryEntry { code: "GBR", name: "United Kingdom", male: 79.4, female: 83.1 },
    CountryEntry { code: "CAN", name: "Canada", male: 79.9, female: 84.1 },
    CountryEntry { code: "AUS", name: "Australia", male: 80.9, female: 85.0 },
    CountryEntry { code: "JPN", name: "Japan", male: 81.6, female: 87.5 },
];

/// In-memory source backed by the fact table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTable;

impl StaticTable {
    pub fn new() -> Self {
        Self
    }

    /// All rows, in display order
    pub fn countries(&self) -> &'static [CountryEntry] {
        &ENTRIES
    }

    /// Find a row by exact code
    pub fn entry(&self, code: &str) -> Option<&'static CountryEntry> {
        ENTRIES.iter().find(|entry| entry.code == code)
    }

    /// Look up by raw form values
    ///
    /// Empty keys fail with `MissingInput`; unknown keys with `NotFound`.
    pub fn lookup(&self, country: &str, gender: &str) -> LookupResult<f64> {
        if country.is_empty() || gender.is_empty() {
            return Err(LookupError::MissingInput);
        }

        let not_found = || LookupError::NotFound {
            country: country.to_string(),
            gender: gender.to_string(),
        };

        let gender = Gender::parse(gender).ok_or_else(not_found)?;
        let entry = self.entry(country).ok_or_else(not_found)?;
        Ok(entry.years(gender))
    }
}

#[async_trait]
impl LifeExpectancySource for StaticTable {
    fn name(&self) -> &str {
        "static-table"
    }

    async fn life_expectancy(&self, country: &CountryCode, gender: Gender) -> LookupResult<f64> {
        self.lookup(country.as_str(), gender.as_str())
    }
}
