//! orbis-core
//!
//! Seams and pure logic shared across the orbis ecosystem.
//!
//! - `source`: the `CountrySource` and `RateSource` role traits.
//! - `store`: the `CountryStore` persistence contract.
//! - `render`: the `SummaryRenderer` contract and summary text layout.
//! - `estimate`: the randomized GDP estimator.
//! - `reconcile`: turns a fetched snapshot into one refresh batch.
//! - `query`: in-memory filter/sort/paginate with the same semantics as the SQL store.
//!
//! Nothing in this crate performs I/O; the refresh pipeline's side effects live
//! behind the traits and are wired together by the `orbis` orchestrator.
#![warn(missing_docs)]

/// GDP estimation from population and exchange rate.
pub mod estimate;
/// In-memory query evaluation.
pub mod query;
/// Reconciliation of fetched records into a refresh batch.
pub mod reconcile;
/// Summary rendering contract.
pub mod render;
/// Upstream data source role traits.
pub mod source;
/// Persistence contract.
pub mod store;

pub use estimate::GdpEstimator;
pub use reconcile::{ReconcilePlan, RefreshBatch, reconcile};
pub use render::{SummaryRenderer, SummarySnapshot, format_gdp, format_timestamp};
pub use source::{CountrySource, DataSource, RateSource};
pub use store::{CommitOutcome, CountryStore};

pub use orbis_types::upstream::{CountryBatch, RateTable, RawCountry, RawCurrency};
pub use orbis_types::{
    ConcurrentRefresh, Country, CountryPage, CountryQuery, CountryUpsert, EstimatorConfig,
    GdpFormula, GdpSentinel, MultiplierRange, OrbisConfig, OrbisError, RateMissPolicy,
    RefreshReport, RegionMatch, SortKey, SortOrder, SourceKey, StatusRecord, StatusReport,
    normalize_name,
};
