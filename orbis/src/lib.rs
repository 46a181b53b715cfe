//! Orbis keeps a local catalogue of countries, exchange rates, and estimated GDP.
//!
//! Overview
//! - Pulls the country directory and a rate table from two upstream sources
//!   implementing the `orbis_core` role traits.
//! - Reconciles both snapshots into one batch, estimating GDP with a seedable
//!   random multiplier.
//! - Commits the batch and the status record through a `CountryStore` in a
//!   single transaction, then renders a best-effort summary image.
//! - Serves filtered, sorted, paginated reads over the same store.
//!
//! Key behaviors and trade-offs
//! - Abort before write: a failing or empty upstream aborts the cycle with no
//!   database changes; the previous status timestamp stays in place.
//! - One timestamp per cycle: every row written by a cycle and the status
//!   record share it, so rows from one cycle compare equal.
//! - Per-record isolation: malformed records are skipped or reported as
//!   warnings; they never abort the cycle.
//! - Single flight: at most one cycle runs per orchestrator. `Reject` fails
//!   overlapping triggers fast; `Wait` queues them.
//! - Rendering is isolated: a render failure is a warning on the report.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use orbis::{Orbis, PngSummaryRenderer, RateMissPolicy};
//!
//! let orbis = Orbis::builder()
//!     .country_source(Arc::new(RestCountriesSource::new_default()?))
//!     .rate_source(Arc::new(ExchangeRateSource::new_default()?))
//!     .store(Arc::new(SqliteCountryStore::connect("sqlite://orbis.db").await?))
//!     .renderer(Arc::new(PngSummaryRenderer::new("cache/summary.png")))
//!     .rate_miss_policy(RateMissPolicy::Null)
//!     .build()?;
//!
//! let report = orbis.refresh().await?;
//! println!("{} processed, {} stored", report.processed, report.total);
//!
//! let page = orbis
//!     .countries(&orbis::CountryQuery::new().region("africa").sort(orbis::SortKey::EstimatedGdp))
//!     .await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod query;
mod refresh;
mod summary;

pub use crate::core::{Clock, Orbis, OrbisBuilder};
pub use refresh::RefreshPhase;
pub use summary::{PngSummaryRenderer, SUMMARY_TITLE, draw as draw_summary};

pub use orbis_core::{
    CommitOutcome, ConcurrentRefresh, Country, CountryPage, CountryQuery, CountrySource,
    CountryStore, CountryUpsert, DataSource, EstimatorConfig, GdpEstimator, GdpFormula,
    GdpSentinel, MultiplierRange, OrbisConfig, OrbisError, RateMissPolicy, RateSource,
    RefreshBatch, RefreshReport, RegionMatch, SortKey, SortOrder, SourceKey, StatusRecord,
    StatusReport, SummaryRenderer, SummarySnapshot, format_gdp, format_timestamp,
};
