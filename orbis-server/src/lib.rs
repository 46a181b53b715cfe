//! HTTP surface for the orbis country catalogue.
//!
//! Routes:
//! - `POST /countries/refresh`: run one refresh cycle and return its report.
//! - `GET /countries`: filtered, sorted, paginated listing (`region`,
//!   `currency`, `sort_by`, `order`, `skip`, `limit`); the match count is in
//!   the `x-total-count` header.
//! - `GET /countries/image`: the latest summary PNG, or 404.
//! - `GET /countries/{name}`, `DELETE /countries/{name}`: case-insensitive.
//! - `GET /status`: last successful refresh and row count.
//! - `GET /health`: liveness.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use orbis::{Orbis, PngSummaryRenderer};
use orbis_sources::{ExchangeRateSource, RestCountriesSource};
use orbis_store::SqliteCountryStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Wired server: state, router, and the background refresh schedule.
pub struct OrbisServer {
    state: AppState,
    router: Router,
    refresh_interval: Option<Duration>,
    refresh_on_start: bool,
    listen_addr: std::net::SocketAddr,
}

impl OrbisServer {
    /// Connect the store and build the orchestrator described by `config`.
    ///
    /// # Errors
    /// Fails for invalid URLs or configuration and when the database cannot be opened.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let cfg = config.orbis_config()?;
        let store = SqliteCountryStore::connect(&config.database_url).await?;
        let countries =
            RestCountriesSource::new(&config.countries_api_url)?.with_timeout(cfg.fetch_timeout);
        let rates =
            ExchangeRateSource::new(&config.exchange_rate_api_url)?.with_timeout(cfg.fetch_timeout);
        let image_path = config.image_path();

        let orbis = Orbis::builder()
            .country_source(Arc::new(countries))
            .rate_source(Arc::new(rates))
            .store(Arc::new(store))
            .renderer(Arc::new(PngSummaryRenderer::new(&image_path)))
            .config(cfg)
            .build()?;

        Ok(Self::new(Arc::new(orbis), image_path)
            .with_schedule(config.refresh_interval(), config.refresh_on_start)
            .with_listen_addr(config.listen_addr))
    }

    /// Serve an already-built orchestrator.
    pub fn new(orbis: Arc<Orbis>, image_path: impl Into<std::path::PathBuf>) -> Self {
        let state = AppState::new(orbis, image_path);
        let router = routes::build_router(state.clone());
        Self {
            state,
            router,
            refresh_interval: None,
            refresh_on_start: false,
            listen_addr: ([0, 0, 0, 0], 8000).into(),
        }
    }

    /// Background refresh every `interval`, and/or once at start-up.
    #[must_use]
    pub const fn with_schedule(mut self, interval: Option<Duration>, on_start: bool) -> Self {
        self.refresh_interval = interval;
        self.refresh_on_start = on_start;
        self
    }

    /// Address `run` binds to.
    #[must_use]
    pub const fn with_listen_addr(mut self, addr: std::net::SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Shared handler state.
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The fully layered router, for serving or `oneshot` tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind, spawn the refresh schedule, and serve until Ctrl-C.
    ///
    /// # Errors
    /// Returns the bind or serve I/O error.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        let scheduler = self.spawn_scheduler();

        info!(
            addr = %self.listen_addr,
            image = %self.state.image_path.display(),
            refresh_interval_secs = self.refresh_interval.map(|d| d.as_secs()),
            refresh_on_start = self.refresh_on_start,
            "orbis server starting"
        );

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(task) = scheduler {
            task.abort();
        }
        result
    }

    fn spawn_scheduler(&self) -> Option<tokio::task::JoinHandle<()>> {
        if self.refresh_interval.is_none() && !self.refresh_on_start {
            return None;
        }
        let orbis = Arc::clone(&self.state.orbis);
        let interval = self.refresh_interval;
        let on_start = self.refresh_on_start;
        Some(tokio::spawn(async move {
            if on_start {
                scheduled_refresh(&orbis).await;
            }
            let Some(period) = interval else {
                return;
            };
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                scheduled_refresh(&orbis).await;
            }
        }))
    }
}

async fn scheduled_refresh(orbis: &Orbis) {
    match orbis.refresh().await {
        Ok(report) => info!(
            processed = report.processed,
            total = report.total,
            refreshed_at = %report.last_refreshed_at,
            "scheduled refresh complete"
        ),
        Err(e) => warn!(error = %e, code = e.kind(), "scheduled refresh failed"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
