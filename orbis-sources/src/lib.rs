//! orbis-sources
//!
//! reqwest-backed implementations of the `CountrySource` and `RateSource`
//! role traits from `orbis-core`:
//!
//! - [`RestCountriesSource`]: the REST Countries v2 directory.
//! - [`ExchangeRateSource`]: the open.er-api.com latest-rates endpoint.
//!
//! Both issue exactly one GET per call with an optional per-request timeout
//! and report every failure as `OrbisError::DataSourceUnavailable`.
#![warn(missing_docs)]

mod countries;
mod http;
mod rates;

pub use countries::RestCountriesSource;
pub use rates::ExchangeRateSource;
