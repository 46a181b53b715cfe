//! Stored country rows and the singleton status record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted country row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name as last seen upstream. Unique ignoring case.
    pub name: String,
    /// Capital city.
    pub capital: Option<String>,
    /// Geographic region (e.g. "Africa").
    pub region: Option<String>,
    /// Population count.
    pub population: u64,
    /// Currency code of the first listed currency.
    pub currency_code: Option<String>,
    /// Local currency units per reference currency unit.
    pub exchange_rate: Option<f64>,
    /// Derived GDP estimate.
    pub estimated_gdp: Option<f64>,
    /// Flag image URL.
    pub flag_url: Option<String>,
    /// Shared timestamp of the refresh cycle that last wrote this row.
    pub last_refreshed_at: DateTime<Utc>,
}

impl Country {
    /// Normalized match key for this row.
    #[must_use]
    pub fn name_key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Mutable fields of a country produced by reconciliation.
///
/// The refresh timestamp is carried once per batch rather than per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryUpsert {
    /// Display name (trimmed).
    pub name: String,
    /// Capital city.
    pub capital: Option<String>,
    /// Geographic region.
    pub region: Option<String>,
    /// Population count, always greater than zero.
    pub population: u64,
    /// Currency code of the first listed currency.
    pub currency_code: Option<String>,
    /// Resolved exchange rate.
    pub exchange_rate: Option<f64>,
    /// GDP estimate or sentinel.
    pub estimated_gdp: Option<f64>,
    /// Flag image URL.
    pub flag_url: Option<String>,
}

impl CountryUpsert {
    /// Normalized match key for this row.
    #[must_use]
    pub fn name_key(&self) -> String {
        normalize_name(&self.name)
    }

    /// Materialize a stored row from this upsert.
    #[must_use]
    pub fn into_country(self, id: i64, refreshed_at: DateTime<Utc>) -> Country {
        Country {
            id,
            name: self.name,
            capital: self.capital,
            region: self.region,
            population: self.population,
            currency_code: self.currency_code,
            exchange_rate: self.exchange_rate,
            estimated_gdp: self.estimated_gdp,
            flag_url: self.flag_url,
            last_refreshed_at: refreshed_at,
        }
    }
}

/// Singleton record tracking the last successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Completion time of the most recent successful refresh transaction.
    pub last_updated: DateTime<Utc>,
}

/// Case-insensitive match key for country names.
///
/// Trims surrounding whitespace and lowercases, so "Chad", " CHAD " and "chad"
/// all address the same row.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
