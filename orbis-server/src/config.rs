//! Server configuration from command-line flags and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use orbis::{
    ConcurrentRefresh, GdpFormula, GdpSentinel, MultiplierRange, OrbisConfig, OrbisError,
    RateMissPolicy, RegionMatch,
};

/// What to store when a country's currency has no exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateMissArg {
    Null,
    DefaultToOne,
}

/// GDP value stored when no estimate can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SentinelArg {
    Zero,
    Null,
}

/// How the exchange rate enters the GDP estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormulaArg {
    Divide,
    Multiply,
}

/// How the `region` query parameter matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegionMatchArg {
    Substring,
    Exact,
}

/// What an overlapping refresh request does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConcurrentArg {
    Reject,
    Wait,
}

/// orbis HTTP server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "orbis-server", version, about = "Country catalogue with exchange rates and GDP estimates")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "ORBIS_LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: SocketAddr,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://orbis.db")]
    pub database_url: String,

    /// Country directory endpoint
    #[arg(
        long,
        env = "COUNTRIES_API_URL",
        default_value = orbis_sources::RestCountriesSource::DEFAULT_URL
    )]
    pub countries_api_url: String,

    /// Exchange-rate endpoint
    #[arg(
        long,
        env = "EXCHANGE_RATE_API_URL",
        default_value = orbis_sources::ExchangeRateSource::DEFAULT_URL
    )]
    pub exchange_rate_api_url: String,

    /// Directory holding the rendered summary image
    #[arg(long, env = "CACHE_DIR", default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Per-source fetch timeout in seconds
    #[arg(long, env = "ORBIS_FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// Exchange rate stored for currencies missing from the rate table
    #[arg(long, env = "ORBIS_RATE_MISS_POLICY", value_enum, default_value = "null")]
    pub rate_miss_policy: RateMissArg,

    /// GDP stored when no estimate can be computed
    #[arg(long, env = "ORBIS_GDP_SENTINEL", value_enum, default_value = "zero")]
    pub gdp_sentinel: SentinelArg,

    /// Whether the estimate divides or multiplies by the rate
    #[arg(long, env = "ORBIS_GDP_FORMULA", value_enum, default_value = "divide")]
    pub gdp_formula: FormulaArg,

    /// Lower bound of the random GDP multiplier
    #[arg(long, env = "ORBIS_GDP_MULTIPLIER_MIN", default_value_t = MultiplierRange::DEFAULT_MIN)]
    pub gdp_multiplier_min: f64,

    /// Upper bound of the random GDP multiplier
    #[arg(long, env = "ORBIS_GDP_MULTIPLIER_MAX", default_value_t = MultiplierRange::DEFAULT_MAX)]
    pub gdp_multiplier_max: f64,

    /// Seed for reproducible GDP estimates
    #[arg(long, env = "ORBIS_GDP_SEED")]
    pub gdp_seed: Option<u64>,

    /// Region filter semantics
    #[arg(long, env = "ORBIS_REGION_MATCH", value_enum, default_value = "substring")]
    pub region_match: RegionMatchArg,

    /// Behavior of overlapping refresh requests
    #[arg(long, env = "ORBIS_CONCURRENT_REFRESH", value_enum, default_value = "reject")]
    pub concurrent_refresh: ConcurrentArg,

    /// Run a refresh every N seconds (disabled when unset)
    #[arg(long, env = "ORBIS_REFRESH_INTERVAL_SECS")]
    pub refresh_interval_secs: Option<u64>,

    /// Run one refresh right after start-up
    #[arg(long, env = "ORBIS_REFRESH_ON_START", default_value = "false")]
    pub refresh_on_start: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "ORBIS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Path of the rendered summary image.
    #[must_use]
    pub fn image_path(&self) -> PathBuf {
        self.cache_dir.join("summary.png")
    }

    /// Interval of the background refresh loop, if enabled.
    #[must_use]
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// Library configuration derived from the flags.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an invalid multiplier range or a zero timeout.
    pub fn orbis_config(&self) -> Result<OrbisConfig, OrbisError> {
        let mut cfg = OrbisConfig {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            rate_miss_policy: match self.rate_miss_policy {
                RateMissArg::Null => RateMissPolicy::Null,
                RateMissArg::DefaultToOne => RateMissPolicy::DefaultToOne,
            },
            region_match: match self.region_match {
                RegionMatchArg::Substring => RegionMatch::Substring,
                RegionMatchArg::Exact => RegionMatch::Exact,
            },
            concurrent_refresh: match self.concurrent_refresh {
                ConcurrentArg::Reject => ConcurrentRefresh::Reject,
                ConcurrentArg::Wait => ConcurrentRefresh::Wait,
            },
            seed: self.gdp_seed,
            ..OrbisConfig::default()
        };
        cfg.estimator.sentinel = match self.gdp_sentinel {
            SentinelArg::Zero => GdpSentinel::Zero,
            SentinelArg::Null => GdpSentinel::Null,
        };
        cfg.estimator.formula = match self.gdp_formula {
            FormulaArg::Divide => GdpFormula::DivideByRate,
            FormulaArg::Multiply => GdpFormula::MultiplyByRate,
        };
        cfg.estimator.multiplier =
            MultiplierRange::new(self.gdp_multiplier_min, self.gdp_multiplier_max)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
