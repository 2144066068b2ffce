//! Application state held by the store

use chrono::NaiveDate;
use serde::Serialize;

use super::{Merge, Store};

/// What the input form produced
///
/// Both fields are written together by the input collector. Until then
/// consumers must skip any work that needs them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub life_expectancy: Option<f64>,
    pub birthdate: Option<NaiveDate>,
}

impl AppState {
    /// Both fields present
    pub fn is_complete(&self) -> bool {
        self.life_expectancy.is_some() && self.birthdate.is_some()
    }

    /// `(life_expectancy, birthdate)` when both are present
    pub fn inputs(&self) -> Option<(f64, NaiveDate)> {
        Some((self.life_expectancy?, self.birthdate?))
    }
}

/// Partial update for [`AppState`]; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub life_expectancy: Option<f64>,
    pub birthdate: Option<NaiveDate>,
}

impl StatePatch {
    pub fn new(life_expectancy: f64, birthdate: NaiveDate) -> Self {
        Self {
            life_expectancy: Some(life_expectancy),
            birthdate: Some(birthdate),
        }
    }

    pub fn life_expectancy(mut self, years: f64) -> Self {
        self.life_expectancy = Some(years);
        self
    }

    pub fn birthdate(mut self, date: NaiveDate) -> Self {
        self.birthdate = Some(date);
        self
    }
}

impl Merge for AppState {
    type Patch = StatePatch;

    fn merge(&mut self, patch: StatePatch) {
        if let Some(years) = patch.life_expectancy {
            self.life_expectancy = Some(years);
        }
        if let Some(date) = patch.birthdate {
            self.birthdate = Some(date);
        }
    }
}

/// The store shared by the input collector and the renderer
pub type AppStore = Store<AppState>;

impl AppStore {
    /// Store starting from the empty state
    pub fn empty() -> Self {
        Store::new(AppState::default())
    }
}
