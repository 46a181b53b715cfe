use std::time::Instant;

use orbis_core::{ConcurrentRefresh, OrbisError, RefreshReport, SummarySnapshot, reconcile};

use crate::Orbis;
use crate::core::lock;

/// Stage of a refresh cycle.
///
/// A cycle walks `Idle → FetchingCountries → FetchingRates → Reconciling →
/// Committing → Rendering → Done`. Either fetch stage and the commit stage may
/// end in `Aborted` instead; a cycle aborted before `Committing` never wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshPhase {
    /// No cycle has run, or the previous one finished.
    Idle,
    /// Waiting on the country directory.
    FetchingCountries,
    /// Waiting on the rate table.
    FetchingRates,
    /// Building the batch in memory.
    Reconciling,
    /// Writing the batch and status in one transaction.
    Committing,
    /// Producing the summary artifact.
    Rendering,
    /// The cycle committed.
    Done,
    /// The cycle failed; see the returned error.
    Aborted,
}

impl RefreshPhase {
    /// Whether `self → next` is a legal step.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        use RefreshPhase::{
            Aborted, Committing, Done, FetchingCountries, FetchingRates, Idle, Reconciling,
            Rendering,
        };
        matches!(
            (self, next),
            (Idle, FetchingCountries)
                | (FetchingCountries, FetchingRates | Aborted)
                | (FetchingRates, Reconciling | Aborted)
                | (Reconciling, Committing)
                | (Committing, Rendering | Done | Aborted)
                | (Rendering, Done)
                | (Done | Aborted, Idle)
        )
    }

    /// True for `Done` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl std::fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::FetchingCountries => "fetching_countries",
            Self::FetchingRates => "fetching_rates",
            Self::Reconciling => "reconciling",
            Self::Committing => "committing",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

impl Orbis {
    fn advance(&self, next: RefreshPhase) -> Result<(), OrbisError> {
        let mut phase = lock(&self.phase);
        if !phase.can_transition(next) {
            return Err(OrbisError::Other(format!(
                "illegal refresh transition {} -> {next}",
                *phase
            )));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = %*phase, to = %next, "refresh phase");
        *phase = next;
        Ok(())
    }

    fn abort(&self, err: OrbisError) -> OrbisError {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, kind = err.kind(), "refresh aborted");
        if let Err(illegal) = self.advance(RefreshPhase::Aborted) {
            return illegal;
        }
        err
    }

    /// Run one refresh cycle: fetch both sources, reconcile, commit, render.
    ///
    /// Only one cycle runs at a time per orchestrator. An overlapping call
    /// fails with `RefreshInProgress` under `ConcurrentRefresh::Reject` and
    /// waits for the running cycle under `ConcurrentRefresh::Wait`.
    ///
    /// Behavior and trade-offs:
    /// - The two fetches run concurrently, each bounded by `fetch_timeout`.
    ///   Any fetch failure, or a country payload with no records, aborts the
    ///   cycle before anything is written.
    /// - Every row and the status record carry one timestamp taken after both
    ///   fetches complete.
    /// - Per-record problems become `warnings`; they never abort the cycle.
    /// - A commit failure rolls back the whole cycle and is returned.
    /// - Rendering runs after the commit and only ever adds a `Render` warning.
    ///
    /// # Errors
    /// Returns `RefreshInProgress`, `DataSourceUnavailable`, `EmptyDataSource`,
    /// or `Persistence`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orbis::refresh",
            skip(self),
            fields(
                countries = self.countries.name(),
                rates = self.rates.name(),
                store = self.store.name(),
            ),
        )
    )]
    pub async fn refresh(&self) -> Result<RefreshReport, OrbisError> {
        let _gate = match self.cfg.concurrent_refresh {
            ConcurrentRefresh::Reject => self
                .gate
                .try_lock()
                .map_err(|_| OrbisError::RefreshInProgress)?,
            ConcurrentRefresh::Wait => self.gate.lock().await,
        };
        let started = Instant::now();

        // Holding the gate, any non-terminal phase belongs to a cancelled cycle.
        *lock(&self.phase) = RefreshPhase::Idle;
        self.advance(RefreshPhase::FetchingCountries)?;

        let timeout = self.cfg.fetch_timeout;
        let (countries, rates) = tokio::join!(
            Self::source_call_with_timeout(
                self.countries.name(),
                "countries",
                timeout,
                self.countries.countries(),
            ),
            Self::source_call_with_timeout(self.rates.name(), "rates", timeout, self.rates.rates()),
        );

        let batch = match countries {
            Ok(batch) if batch.records.is_empty() => {
                return Err(self.abort(OrbisError::empty_data_source(self.countries.name())));
            }
            Ok(batch) => batch,
            Err(e) => return Err(self.abort(e)),
        };
        self.advance(RefreshPhase::FetchingRates)?;
        let rates = match rates {
            Ok(rates) => rates,
            Err(e) => return Err(self.abort(e)),
        };
        self.advance(RefreshPhase::Reconciling)?;

        let refreshed_at = (self.clock)();
        let plan = {
            let mut rng = lock(&self.rng);
            reconcile(
                batch.records,
                &rates,
                self.cfg.rate_miss_policy,
                &self.estimator,
                refreshed_at,
                &mut *rng,
            )
        };
        let mut warnings = batch.rejected;
        warnings.extend(plan.rejected);

        self.advance(RefreshPhase::Committing)?;
        let outcome = match self.store.commit_refresh(&plan.batch).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.abort(e)),
        };
        warnings.extend(outcome.row_errors);

        let summary_rendered = match &self.renderer {
            Some(renderer) => {
                self.advance(RefreshPhase::Rendering)?;
                match self.render_summary(renderer.as_ref(), outcome.total, refreshed_at).await {
                    Ok(()) => true,
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(renderer = renderer.name(), error = %e, "summary render failed");
                        warnings.push(e);
                        false
                    }
                }
            }
            None => false,
        };
        self.advance(RefreshPhase::Done)?;

        let report = RefreshReport {
            last_refreshed_at: refreshed_at,
            processed: outcome.inserted + outcome.updated,
            inserted: outcome.inserted,
            updated: outcome.updated,
            skipped: plan.skipped,
            duplicates: plan.duplicates,
            total: outcome.total,
            warnings,
            summary_rendered,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            inserted = report.inserted,
            updated = report.updated,
            skipped = report.skipped,
            duplicates = report.duplicates,
            total = report.total,
            warnings = report.warnings.len(),
            refreshed_at = %report.last_refreshed_at,
            elapsed_ms = report.elapsed_ms,
            "refresh complete"
        );

        Ok(report)
    }

    async fn render_summary(
        &self,
        renderer: &dyn orbis_core::SummaryRenderer,
        total: u64,
        last_refreshed_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), OrbisError> {
        let top = self
            .store
            .top_by_gdp(self.cfg.summary_top_n)
            .await
            .map_err(|e| OrbisError::render(format!("reading top countries: {e}")))?;
        let snapshot = SummarySnapshot {
            total,
            top,
            last_refreshed_at,
        };
        renderer.render(&snapshot).await
    }
}
