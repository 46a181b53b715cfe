use async_trait::async_trait;

use crate::OrbisError;
use orbis_types::SourceKey;
use orbis_types::upstream::{CountryBatch, RateTable};

/// Identity shared by every upstream data source.
pub trait DataSource: Send + Sync {
    /// Stable identifier used in errors and logs (e.g. "restcountries").
    fn name(&self) -> &'static str;

    /// Human-readable vendor label.
    fn vendor(&self) -> &'static str {
        self.name()
    }

    /// Typed key for this source.
    fn key(&self) -> SourceKey {
        SourceKey::new(self.name())
    }
}

/// Focused role trait for sources that serve the country directory.
#[async_trait]
pub trait CountrySource: DataSource {
    /// Fetch the full country directory.
    ///
    /// Implementations issue a single request and never retry. Transport
    /// failures, timeouts, non-success statuses, and unusable payloads map to
    /// `OrbisError::DataSourceUnavailable`. Elements that fail to decode
    /// individually go to `CountryBatch::rejected`.
    async fn countries(&self) -> Result<CountryBatch, OrbisError>;
}

/// Focused role trait for sources that serve exchange rates.
#[async_trait]
pub trait RateSource: DataSource {
    /// Fetch the currency code → rate mapping relative to the reference currency.
    ///
    /// Same failure contract as [`CountrySource::countries`]. An empty mapping
    /// is a valid answer.
    async fn rates(&self) -> Result<RateTable, OrbisError>;
}
