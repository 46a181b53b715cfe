//! Read-side query description and result page.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::country::Country;
use crate::error::OrbisError;

/// Column a country listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Order by name (case-insensitive).
    Name,
    /// Order by population.
    #[default]
    Population,
    /// Order by estimated GDP; rows without an estimate come last.
    EstimatedGdp,
}

impl SortKey {
    /// Direction used when the caller does not pick one: ascending for
    /// strings, descending for numbers.
    #[must_use]
    pub const fn default_order(self) -> SortOrder {
        match self {
            Self::Name => SortOrder::Asc,
            Self::Population | Self::EstimatedGdp => SortOrder::Desc,
        }
    }

    /// Canonical string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Population => "population",
            Self::EstimatedGdp => "estimated_gdp",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = OrbisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "population" => Ok(Self::Population),
            "estimated_gdp" | "gdp" => Ok(Self::EstimatedGdp),
            other => Err(OrbisError::InvalidArg(format!(
                "unknown sort key '{other}'; expected name, population, or estimated_gdp"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl FromStr for SortOrder {
    type Err = OrbisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(OrbisError::InvalidArg(format!(
                "unknown sort order '{other}'; expected asc or desc"
            ))),
        }
    }
}

/// Filter, ordering, and pagination for a country listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryQuery {
    /// Region filter; matched per the configured `RegionMatch`.
    pub region: Option<String>,
    /// Currency code filter, matched exactly ignoring case.
    pub currency: Option<String>,
    /// Ordering column.
    pub sort: SortKey,
    /// Explicit direction; `None` uses `sort.default_order()`.
    pub order: Option<SortOrder>,
    /// Number of matching rows to skip.
    pub skip: u64,
    /// Page size; `None` uses the orchestrator default.
    pub limit: Option<u64>,
}

impl Default for CountryQuery {
    fn default() -> Self {
        Self {
            region: None,
            currency: None,
            sort: SortKey::default(),
            order: None,
            skip: 0,
            limit: None,
        }
    }
}

impl CountryQuery {
    /// Page size applied when neither the query nor the orchestrator sets one.
    pub const DEFAULT_LIMIT: u64 = 100;

    /// Start an unfiltered query with default ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Filter by currency code.
    #[must_use]
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    /// Order by `key` in its default direction.
    #[must_use]
    pub const fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    /// Override the sort direction.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the offset.
    #[must_use]
    pub const fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Direction actually applied.
    #[must_use]
    pub fn effective_order(&self) -> SortOrder {
        self.order.unwrap_or_else(|| self.sort.default_order())
    }

    /// Page size actually applied.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    /// Region filter with surrounding whitespace removed; blank filters are ignored.
    #[must_use]
    pub fn region_filter(&self) -> Option<&str> {
        self.region.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Currency filter with surrounding whitespace removed; blank filters are ignored.
    #[must_use]
    pub fn currency_filter(&self) -> Option<&str> {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of a country listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryPage {
    /// Rows on this page.
    pub items: Vec<Country>,
    /// Number of rows matching the filter, ignoring pagination.
    pub total: u64,
    /// Offset applied.
    pub skip: u64,
    /// Page size applied.
    pub limit: u64,
}
