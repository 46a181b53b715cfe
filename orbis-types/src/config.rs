//! Configuration types shared across the orchestrator, stores, and sources.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OrbisError;
use crate::query::CountryQuery;

/// What to store as the exchange rate when a country's currency code is not
/// present in the fetched rate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMissPolicy {
    /// Store a null rate; the GDP estimate falls back to the sentinel.
    #[default]
    Null,
    /// Treat the currency as pegged 1:1 to the reference currency.
    DefaultToOne,
}

/// Value stored as the GDP estimate when no estimate can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GdpSentinel {
    /// Store `0.0`.
    #[default]
    Zero,
    /// Store null.
    Null,
}

impl GdpSentinel {
    /// The concrete value written for this sentinel.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Zero => Some(0.0),
            Self::Null => None,
        }
    }
}

/// How the exchange rate enters the GDP estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GdpFormula {
    /// `population × multiplier ÷ rate`: rates are local units per reference
    /// unit, so dividing converts into the reference currency.
    #[default]
    DivideByRate,
    /// `population × multiplier × rate`.
    MultiplyByRate,
}

/// How the `region` filter matches stored regions. Both variants ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMatch {
    /// The filter must appear somewhere in the region ("afr" matches "Africa").
    #[default]
    Substring,
    /// The filter must equal the region.
    Exact,
}

/// What happens when a refresh is triggered while another one is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentRefresh {
    /// Fail fast with `OrbisError::RefreshInProgress`.
    #[default]
    Reject,
    /// Queue behind the running cycle.
    Wait,
}

/// Uniform range the GDP multiplier is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl MultiplierRange {
    /// Default lower bound of the multiplier.
    pub const DEFAULT_MIN: f64 = 1000.0;
    /// Default upper bound of the multiplier.
    pub const DEFAULT_MAX: f64 = 2000.0;

    /// Construct a validated range.
    ///
    /// # Errors
    /// Returns `InvalidArg` unless both bounds are finite, positive, and `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, OrbisError> {
        let r = Self { min, max };
        r.validate()?;
        Ok(r)
    }

    /// A degenerate range that always yields `value`; useful for deterministic runs.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `value` is not finite and positive.
    pub fn fixed(value: f64) -> Result<Self, OrbisError> {
        Self::new(value, value)
    }

    /// Validate the bounds.
    ///
    /// # Errors
    /// Returns `InvalidArg` unless both bounds are finite, positive, and `min <= max`.
    pub fn validate(&self) -> Result<(), OrbisError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(OrbisError::InvalidArg(
                "multiplier bounds must be finite".to_string(),
            ));
        }
        if self.min <= 0.0 {
            return Err(OrbisError::InvalidArg(format!(
                "multiplier lower bound must be positive, got {}",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(OrbisError::InvalidArg(format!(
                "multiplier range is empty: {}..={}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Returns true when `value` lies within the inclusive bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for MultiplierRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Settings for the GDP estimator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// How the exchange rate enters the estimate.
    pub formula: GdpFormula,
    /// Value used whenever no estimate can be computed.
    pub sentinel: GdpSentinel,
    /// Range the random multiplier is drawn from.
    pub multiplier: MultiplierRange,
}

/// Global configuration for the `Orbis` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbisConfig {
    /// Timeout applied to each upstream fetch.
    pub fetch_timeout: Duration,
    /// Exchange-rate fallback for currency codes absent from the rate mapping.
    pub rate_miss_policy: RateMissPolicy,
    /// GDP estimator settings.
    pub estimator: EstimatorConfig,
    /// Region filter semantics for read queries.
    pub region_match: RegionMatch,
    /// Behavior when refresh triggers overlap.
    pub concurrent_refresh: ConcurrentRefresh,
    /// Number of countries listed on the summary image.
    pub summary_top_n: usize,
    /// Page size used when a query does not specify one.
    pub default_page_size: u64,
    /// Largest page size a query may request.
    pub max_page_size: u64,
    /// Optional seed for the GDP multiplier generator; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for OrbisConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            rate_miss_policy: RateMissPolicy::default(),
            estimator: EstimatorConfig::default(),
            region_match: RegionMatch::default(),
            concurrent_refresh: ConcurrentRefresh::default(),
            summary_top_n: 5,
            default_page_size: CountryQuery::DEFAULT_LIMIT,
            max_page_size: 1000,
            seed: None,
        }
    }
}

impl OrbisConfig {
    /// Validate cross-field constraints.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero fetch timeout, an invalid multiplier
    /// range, or inconsistent page sizes.
    pub fn validate(&self) -> Result<(), OrbisError> {
        if self.fetch_timeout.is_zero() {
            return Err(OrbisError::InvalidArg(
                "fetch timeout must be greater than zero".to_string(),
            ));
        }
        self.estimator.multiplier.validate()?;
        if self.max_page_size == 0 {
            return Err(OrbisError::InvalidArg(
                "max page size must be greater than zero".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(OrbisError::InvalidArg(format!(
                "default page size must be within 1..={}, got {}",
                self.max_page_size, self.default_page_size
            )));
        }
        Ok(())
    }
}
