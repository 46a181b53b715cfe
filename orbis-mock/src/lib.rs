//! Deterministic test doubles for every orbis seam.
//!
//! - [`MockSource`]: fixture country directory and rate table.
//! - [`DynamicMockSource`]: sources scripted at runtime through a controller.
//! - [`MemoryCountryStore`]: transactional in-memory `CountryStore` with fault injection.
//! - [`RecordingRenderer`] / [`FailingRenderer`]: summary renderers for assertions.
use async_trait::async_trait;
use orbis_core::{
    CountryBatch, CountrySource, DataSource, OrbisError, RateSource, RateTable, RawCountry,
};

mod dynamic;
mod fixtures;
mod render;
mod store;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};
pub use render::{FailingRenderer, RecordingRenderer};
pub use store::MemoryCountryStore;

/// Fixture-backed source serving both the country directory and the rate table.
pub struct MockSource;

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The fixture country records.
    #[must_use]
    pub fn countries_fixture() -> Vec<RawCountry> {
        fixtures::countries::all()
    }

    /// The fixture rate table.
    #[must_use]
    pub fn rates_fixture() -> RateTable {
        fixtures::rates::usd()
    }
}

impl DataSource for MockSource {
    fn name(&self) -> &'static str {
        "orbis-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }
}

#[async_trait]
impl CountrySource for MockSource {
    async fn countries(&self) -> Result<CountryBatch, OrbisError> {
        Ok(CountryBatch::from(fixtures::countries::all()))
    }
}

#[async_trait]
impl RateSource for MockSource {
    async fn rates(&self) -> Result<RateTable, OrbisError> {
        Ok(fixtures::rates::usd())
    }
}
