//! Orbis-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod country;
mod error;
mod query;
mod reports;
mod source;
pub mod upstream;

pub use config::{
    ConcurrentRefresh, EstimatorConfig, GdpFormula, GdpSentinel, MultiplierRange, OrbisConfig,
    RateMissPolicy, RegionMatch,
};
pub use country::{Country, CountryUpsert, StatusRecord, normalize_name};
pub use error::OrbisError;
pub use query::{CountryPage, CountryQuery, SortKey, SortOrder};
pub use reports::{RefreshReport, StatusReport};
pub use source::SourceKey;
