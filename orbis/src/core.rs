use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use orbis_core::{
    ConcurrentRefresh, CountrySource, CountryStore, GdpEstimator, GdpFormula, GdpSentinel,
    MultiplierRange, OrbisError, RateMissPolicy, RateSource, RegionMatch, SummaryRenderer,
};
use orbis_types::OrbisConfig;

use crate::refresh::RefreshPhase;

/// Source of the shared cycle timestamp.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Orchestrator that sequences one refresh cycle against its collaborators
/// and serves the read-side queries over the same store.
pub struct Orbis {
    pub(crate) countries: Arc<dyn CountrySource>,
    pub(crate) rates: Arc<dyn RateSource>,
    pub(crate) store: Arc<dyn CountryStore>,
    pub(crate) renderer: Option<Arc<dyn SummaryRenderer>>,
    pub(crate) cfg: OrbisConfig,
    pub(crate) estimator: GdpEstimator,
    pub(crate) rng: Mutex<StdRng>,
    pub(crate) gate: tokio::sync::Mutex<()>,
    pub(crate) phase: Mutex<RefreshPhase>,
    pub(crate) clock: Clock,
}

/// Builder for constructing an `Orbis` orchestrator with custom configuration.
pub struct OrbisBuilder {
    countries: Option<Arc<dyn CountrySource>>,
    rates: Option<Arc<dyn RateSource>>,
    store: Option<Arc<dyn CountryStore>>,
    renderer: Option<Arc<dyn SummaryRenderer>>,
    cfg: OrbisConfig,
    clock: Option<Clock>,
}

impl Default for OrbisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbisBuilder {
    /// Create a new builder with default configuration and no collaborators.
    ///
    /// A country source, a rate source, and a store are required. The
    /// renderer is optional; without one the rendering stage is skipped.
    #[must_use]
    pub fn new() -> Self {
        Self {
            countries: None,
            rates: None,
            store: None,
            renderer: None,
            cfg: OrbisConfig::default(),
            clock: None,
        }
    }

    /// Set the country directory source.
    #[must_use]
    pub fn country_source(mut self, source: Arc<dyn CountrySource>) -> Self {
        self.countries = Some(source);
        self
    }

    /// Set the exchange-rate source.
    #[must_use]
    pub fn rate_source(mut self, source: Arc<dyn RateSource>) -> Self {
        self.rates = Some(source);
        self
    }

    /// Use one value for both sources.
    #[must_use]
    pub fn sources<S>(self, source: Arc<S>) -> Self
    where
        S: CountrySource + RateSource + 'static,
    {
        let countries: Arc<dyn CountrySource> = source.clone();
        let rates: Arc<dyn RateSource> = source;
        self.country_source(countries).rate_source(rates)
    }

    /// Set the backing store. Queries and refresh commits share it.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn CountryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the summary renderer run after each successful commit.
    #[must_use]
    pub fn renderer(mut self, renderer: Arc<dyn SummaryRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: OrbisConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-source fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.fetch_timeout = timeout;
        self
    }

    /// Choose what to store when a currency code has no rate.
    #[must_use]
    pub const fn rate_miss_policy(mut self, policy: RateMissPolicy) -> Self {
        self.cfg.rate_miss_policy = policy;
        self
    }

    /// Choose the value stored when no GDP estimate can be computed.
    #[must_use]
    pub const fn gdp_sentinel(mut self, sentinel: GdpSentinel) -> Self {
        self.cfg.estimator.sentinel = sentinel;
        self
    }

    /// Choose how the rate enters the GDP estimate.
    #[must_use]
    pub const fn gdp_formula(mut self, formula: GdpFormula) -> Self {
        self.cfg.estimator.formula = formula;
        self
    }

    /// Set the uniform range of the GDP multiplier.
    #[must_use]
    pub const fn multiplier_range(mut self, range: MultiplierRange) -> Self {
        self.cfg.estimator.multiplier = range;
        self
    }

    /// Choose how the `region` filter matches.
    #[must_use]
    pub const fn region_match(mut self, mode: RegionMatch) -> Self {
        self.cfg.region_match = mode;
        self
    }

    /// Choose what an overlapping refresh trigger does.
    #[must_use]
    pub const fn concurrent_refresh(mut self, mode: ConcurrentRefresh) -> Self {
        self.cfg.concurrent_refresh = mode;
        self
    }

    /// Number of countries listed on the summary.
    #[must_use]
    pub const fn summary_top_n(mut self, n: usize) -> Self {
        self.cfg.summary_top_n = n;
        self
    }

    /// Page size used when a query does not set one.
    #[must_use]
    pub const fn default_page_size(mut self, n: u64) -> Self {
        self.cfg.default_page_size = n;
        self
    }

    /// Largest page size a query may request.
    #[must_use]
    pub const fn max_page_size(mut self, n: u64) -> Self {
        self.cfg.max_page_size = n;
        self
    }

    /// Seed the multiplier generator for reproducible estimates.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.cfg.seed = Some(seed);
        self
    }

    /// Override the clock that stamps each cycle.
    #[must_use]
    pub fn clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Build the `Orbis` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a required collaborator is missing or the
    /// configuration does not validate.
    pub fn build(self) -> Result<Orbis, OrbisError> {
        self.cfg.validate()?;
        let countries = self.countries.ok_or_else(|| {
            OrbisError::InvalidArg(
                "no country source registered; add one via country_source(...)".to_string(),
            )
        })?;
        let rates = self.rates.ok_or_else(|| {
            OrbisError::InvalidArg(
                "no rate source registered; add one via rate_source(...)".to_string(),
            )
        })?;
        let store = self.store.ok_or_else(|| {
            OrbisError::InvalidArg("no store registered; add one via store(...)".to_string())
        })?;

        let rng = match self.cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Orbis {
            countries,
            rates,
            store,
            renderer: self.renderer,
            estimator: GdpEstimator::new(self.cfg.estimator),
            cfg: self.cfg,
            rng: Mutex::new(rng),
            gate: tokio::sync::Mutex::new(()),
            phase: Mutex::new(RefreshPhase::Idle),
            clock: self.clock.unwrap_or_else(|| Arc::new(Utc::now)),
        })
    }
}

impl Orbis {
    /// Start building a new `Orbis` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let orbis = orbis::Orbis::builder()
    ///     .country_source(Arc::new(RestCountriesSource::new_default()?))
    ///     .rate_source(Arc::new(ExchangeRateSource::new_default()?))
    ///     .store(Arc::new(SqliteCountryStore::connect("sqlite://orbis.db").await?))
    ///     .renderer(Arc::new(PngSummaryRenderer::new("cache/summary.png")))
    ///     .build()?;
    /// let report = orbis.refresh().await?;
    /// ```
    #[must_use]
    pub fn builder() -> OrbisBuilder {
        OrbisBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OrbisConfig {
        &self.cfg
    }

    /// Phase the most recent refresh cycle reached.
    #[must_use]
    pub fn phase(&self) -> RefreshPhase {
        *lock(&self.phase)
    }

    /// Wrap a source future with a timeout and map expiry to `DataSourceUnavailable`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orbis::core::source_call_with_timeout",
            skip(fut),
            fields(
                source = source_name,
                operation = operation,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        source_name: &'static str,
        operation: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, OrbisError>
    where
        Fut: std::future::Future<Output = Result<T, OrbisError>>,
    {
        (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
            Err(OrbisError::data_source_unavailable(
                source_name,
                format!("{operation} timed out after {}ms", timeout.as_millis()),
            ))
        })
    }
}

/// Lock a std mutex, recovering the value if a panicking holder poisoned it.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
