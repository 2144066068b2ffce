//! Input Collector
//!
//! Validates a submission, asks the lookup source for a life expectancy and
//! writes both values to the store in one update.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{RawSubmission, SubmitError, Submission};
use crate::expectancy::LifeExpectancySource;
use crate::store::{AppStore, StatePatch};

/// Result of an accepted submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accepted {
    pub submission: Submission,
    pub life_expectancy: f64,
}

/// Turns form input into store updates
pub struct InputCollector {
    source: Arc<dyn LifeExpectancySource>,
    store: AppStore,
    in_flight: AtomicBool,
}

impl InputCollector {
    pub fn new(source: Arc<dyn LifeExpectancySource>, store: AppStore) -> Self {
        Self {
            source,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// A lookup is currently pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate, look up, and publish
    ///
    /// The store is only written on success. While one call is awaiting its
    /// lookup, further calls fail fast with [`SubmitError::InFlight`].
    pub async fn submit(
        &self,
        raw: &RawSubmission,
        today: NaiveDate,
    ) -> Result<Accepted, SubmitError> {
        let submission = raw.validate(today).map_err(|e| {
            tracing::warn!(error = %e, "Submission rejected");
            e
        })?;

        let _latch = InFlightLatch::acquire(&self.in_flight).ok_or_else(|| {
            tracing::warn!("Submission ignored while another lookup is pending");
            SubmitError::InFlight
        })?;

        let life_expectancy = self
            .source
            .life_expectancy(&submission.country, submission.gender)
            .await
            .map_err(|e| {
                tracing::error!(
                    source = self.source.name(),
                    country = %submission.country,
                    gender = %submission.gender,
                    error = %e,
                    "Life expectancy lookup failed"
                );
                e
            })?;

        tracing::info!(
            country = %submission.country,
            gender = %submission.gender,
            life_expectancy,
            "Submission accepted"
        );

        self.store
            .set_state(StatePatch::new(life_expectancy, submission.birthdate));

        Ok(Accepted {
            submission,
            life_expectancy,
        })
    }
}

/// Clears the flag on drop, so every exit path releases it
struct InFlightLatch<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightLatch<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightLatch<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectancy::{CountryCode, Gender, LookupError, LookupResult, StaticTable};
    use crate::input::ValidationError;
    use crate::store::AppState;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 1, 1)
    }

    /// Source that waits for a signal before answering
    struct GatedSource {
        gate: Arc<Notify>,
        years: f64,
    }

    #[async_trait]
    impl LifeExpectancySource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn life_expectancy(&self, _: &CountryCode, _: Gender) -> LookupResult<f64> {
            self.gate.notified().await;
            Ok(self.years)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl LifeExpectancySource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn life_expectancy(&self, _: &CountryCode, _: Gender) -> LookupResult<f64> {
            Err(LookupError::Source("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_submit_writes_store() {
        let store = AppStore::empty();
        let collector = InputCollector::new(Arc::new(StaticTable::new()), store.clone());

        let notified = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&notified);
        let _sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        let raw = RawSubmission::new("female", "01/01/1990", "USA");
        let accepted = collector.submit(&raw, today()).await.unwrap();

        assert_eq!(accepted.life_expectancy, 81.1);
        assert_eq!(store.get_state().inputs(), Some((81.1, date(1990, 1, 1))));
        // Both fields land in a single notification
        assert_eq!(*notified.lock().unwrap(), 1);
        assert!(!collector.is_busy());
    }

    #[tokio::test]
    async fn test_validation_error_leaves_store_untouched() {
        let store = AppStore::empty();
        let collector = InputCollector::new(Arc::new(StaticTable::new()), store.clone());

        let raw = RawSubmission::new("male", "02/30/2020", "USA");
        let err = collector.submit(&raw, today()).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Validation(ValidationError::InvalidDate(_))
        ));
        assert!(!store.get_state().is_complete());
    }

    #[tokio::test]
    async fn test_unknown_country_is_lookup_error() {
        let store = AppStore::empty();
        let collector = InputCollector::new(Arc::new(StaticTable::new()), store.clone());

        let raw = RawSubmission::new("male", "01/01/1990", "FRA");
        let err = collector.submit(&raw, today()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Lookup(LookupError::NotFound { .. })));
        assert_eq!(*store.get_state(), AppState::default());
    }

    #[tokio::test]
    async fn test_failed_lookup_releases_latch() {
        let store = AppStore::empty();
        let collector = InputCollector::new(Arc::new(FailingSource), store.clone());
        let raw = RawSubmission::new("male", "01/01/1990", "USA");

        for _ in 0..2 {
            let err = collector.submit(&raw, today()).await.unwrap_err();
            assert!(matches!(err, SubmitError::Lookup(LookupError::Source(_))));
            assert!(!collector.is_busy());
        }
        assert!(!store.get_state().is_complete());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let store = AppStore::empty();
        let source = GatedSource {
            gate: Arc::clone(&gate),
            years: 83.1,
        };
        let collector = InputCollector::new(Arc::new(source), store.clone());

        let first = RawSubmission::new("female", "05/05/1985", "GBR");
        let second = RawSubmission::new("male", "01/01/1970", "CAN");

        let (a, b, _) = tokio::join!(
            collector.submit(&first, today()),
            collector.submit(&second, today()),
            async {
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );

        assert_eq!(a.unwrap().life_expectancy, 83.1);
        assert_eq!(b.unwrap_err(), SubmitError::InFlight);
        assert_eq!(store.get_state().birthdate, Some(date(1985, 5, 5)));
        assert!(!collector.is_busy());
    }
}
