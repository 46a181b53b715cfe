use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use orbis_core::{CountryBatch, CountrySource, DataSource, OrbisError, RateSource, RateTable};

use crate::fixtures;

/// Instruction for how a fetch should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(OrbisError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

struct InternalState {
    countries: MockBehavior<CountryBatch>,
    rates: MockBehavior<RateTable>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            countries: MockBehavior::Return(CountryBatch::from(fixtures::countries::all())),
            rates: MockBehavior::Return(fixtures::rates::usd()),
        }
    }
}

#[derive(Default)]
struct CallCounts {
    countries: AtomicUsize,
    rates: AtomicUsize,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    calls: Arc<CallCounts>,
}

impl DynamicMockController {
    /// Set the behavior of the next and all later `countries` calls.
    pub async fn set_countries_behavior(&self, behavior: MockBehavior<CountryBatch>) {
        self.state.lock().await.countries = behavior;
    }

    /// Set the behavior of the next and all later `rates` calls.
    pub async fn set_rates_behavior(&self, behavior: MockBehavior<RateTable>) {
        self.state.lock().await.rates = behavior;
    }

    /// Make `countries` fail as an unreachable upstream.
    pub async fn fail_countries(&self, cause: &str) {
        self.set_countries_behavior(MockBehavior::Fail(OrbisError::data_source_unavailable(
            self.name, cause,
        )))
        .await;
    }

    /// Make `rates` fail as an unreachable upstream.
    pub async fn fail_rates(&self, cause: &str) {
        self.set_rates_behavior(MockBehavior::Fail(OrbisError::data_source_unavailable(
            self.name, cause,
        )))
        .await;
    }

    /// Number of `countries` calls observed so far.
    #[must_use]
    pub fn countries_calls(&self) -> usize {
        self.calls.countries.load(Ordering::SeqCst)
    }

    /// Number of `rates` calls observed so far.
    #[must_use]
    pub fn rates_calls(&self) -> usize {
        self.calls.rates.load(Ordering::SeqCst)
    }

    /// Restore the fixture behaviors.
    pub async fn reset(&self) {
        *self.state.lock().await = InternalState::default();
    }
}

/// A source that defers all behavior to an external controller.
///
/// Starts out serving the same fixtures as [`MockSource`](crate::MockSource).
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    calls: Arc<CallCounts>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let calls = Arc::new(CallCounts::default());
        let controller = DynamicMockController {
            name,
            state: Arc::clone(&state),
            calls: Arc::clone(&calls),
        };
        (Arc::new(Self { name, state, calls }), controller)
    }

    async fn play<T: Clone>(behavior: MockBehavior<T>) -> Result<T, OrbisError> {
        match behavior {
            MockBehavior::Return(v) => Ok(v),
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}

impl DataSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }
}

#[async_trait]
impl CountrySource for DynamicMockSource {
    async fn countries(&self) -> Result<CountryBatch, OrbisError> {
        self.calls.countries.fetch_add(1, Ordering::SeqCst);
        // Snapshot the behavior so the lock is not held while hanging.
        let behavior = self.state.lock().await.countries.clone();
        Self::play(behavior).await
    }
}

#[async_trait]
impl RateSource for DynamicMockSource {
    async fn rates(&self) -> Result<RateTable, OrbisError> {
        self.calls.rates.fetch_add(1, Ordering::SeqCst);
        let behavior = self.state.lock().await.rates.clone();
        Self::play(behavior).await
    }
}
