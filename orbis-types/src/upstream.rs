//! Wire shapes of the upstream country directory and rate table.
//!
//! Every field is optional on the wire; validation happens during
//! reconciliation, not decoding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::OrbisError;

/// One currency entry of a country record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCurrency {
    /// Currency code, e.g. "NGN".
    pub code: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Display symbol.
    pub symbol: Option<String>,
}

/// One country record as served by the country directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCountry {
    /// Country name.
    pub name: Option<String>,
    /// Capital city.
    pub capital: Option<String>,
    /// Geographic region.
    pub region: Option<String>,
    /// Population; signed so negative values survive decoding and can be rejected.
    pub population: Option<i64>,
    /// Flag image URL.
    pub flag: Option<String>,
    /// Currencies in upstream order; the first one is used.
    pub currencies: Option<Vec<RawCurrency>>,
}

impl RawCountry {
    /// Shorthand for a named record with a population and at most one currency.
    #[must_use]
    pub fn new(name: impl Into<String>, population: i64, currency: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            population: Some(population),
            currencies: currency.map(|c| {
                vec![RawCurrency {
                    code: Some(c.to_string()),
                    ..RawCurrency::default()
                }]
            }),
            ..Self::default()
        }
    }

    /// Code of the first listed currency, trimmed; blank codes count as absent.
    #[must_use]
    pub fn first_currency_code(&self) -> Option<&str> {
        self.currencies
            .as_ref()?
            .first()?
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Currency code → units of that currency per reference unit.
pub type RateTable = HashMap<String, f64>;

/// Decoded country payload.
///
/// `rejected` holds elements of the upstream array that could not be decoded
/// into a [`RawCountry`]; they never abort the fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryBatch {
    /// Records that decoded cleanly.
    pub records: Vec<RawCountry>,
    /// Per-element decode failures.
    pub rejected: Vec<OrbisError>,
}

impl CountryBatch {
    /// Returns true when nothing at all was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<RawCountry>> for CountryBatch {
    fn from(records: Vec<RawCountry>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}
