use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use orbis_core::query::{evaluate, top_by_gdp};
use orbis_core::{
    CommitOutcome, Country, CountryPage, CountryQuery, CountryStore, OrbisError, RefreshBatch,
    RegionMatch, StatusRecord, normalize_name,
};

#[derive(Clone, Default)]
struct Snapshot {
    rows: Vec<Country>,
    next_id: i64,
    status: Option<StatusRecord>,
}

#[derive(Default)]
struct Faults {
    fail_next_commit: Option<OrbisError>,
    reject_names: HashSet<String>,
}

/// In-memory `CountryStore`.
///
/// A commit builds a private copy of the current snapshot and swaps it in only
/// when every step succeeded, so injected failures leave no partial state.
#[derive(Default)]
pub struct MemoryCountryStore {
    state: RwLock<Snapshot>,
    faults: Mutex<Faults>,
    commits: AtomicUsize,
}

impl MemoryCountryStore {
    /// An empty store with no status record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `commit_refresh` with `err` before anything is applied.
    pub async fn fail_next_commit(&self, err: OrbisError) {
        self.faults.lock().await.fail_next_commit = Some(err);
    }

    /// Refuse rows with this name (ignoring case) as if a constraint rejected them.
    pub async fn reject_row(&self, name: &str) {
        self.faults.lock().await.reject_names.insert(normalize_name(name));
    }

    /// Number of commits that were applied.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Copy of every stored row in insertion order.
    pub async fn rows(&self) -> Vec<Country> {
        self.state.read().await.rows.clone()
    }
}

#[async_trait]
impl CountryStore for MemoryCountryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn commit_refresh(&self, batch: &RefreshBatch) -> Result<CommitOutcome, OrbisError> {
        let reject_names = {
            let mut faults = self.faults.lock().await;
            if let Some(err) = faults.fail_next_commit.take() {
                return Err(err);
            }
            faults.reject_names.clone()
        };

        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let mut outcome = CommitOutcome::default();

        for row in &batch.rows {
            let key = row.name_key();
            if reject_names.contains(&key) {
                outcome.row_errors.push(OrbisError::record(
                    row.name.clone(),
                    "constraint violation (injected)",
                ));
                continue;
            }
            if let Some(existing) = next.rows.iter_mut().find(|c| c.name_key() == key) {
                *existing = row.clone().into_country(existing.id, batch.refreshed_at);
                outcome.updated += 1;
            } else {
                next.next_id += 1;
                next.rows
                    .push(row.clone().into_country(next.next_id, batch.refreshed_at));
                outcome.inserted += 1;
            }
        }

        next.status = match next.status {
            Some(s) if s.last_updated >= batch.refreshed_at => Some(s),
            _ => Some(StatusRecord {
                last_updated: batch.refreshed_at,
            }),
        };
        outcome.total = next.rows.len() as u64;

        *guard = next;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(outcome)
    }

    async fn list_countries(
        &self,
        query: &CountryQuery,
        region_match: RegionMatch,
    ) -> Result<CountryPage, OrbisError> {
        Ok(evaluate(&self.state.read().await.rows, query, region_match))
    }

    async fn country_by_name(&self, name: &str) -> Result<Option<Country>, OrbisError> {
        let key = normalize_name(name);
        Ok(self
            .state
            .read()
            .await
            .rows
            .iter()
            .find(|c| c.name_key() == key)
            .cloned())
    }

    async fn delete_country(&self, name: &str) -> Result<bool, OrbisError> {
        let key = normalize_name(name);
        let mut guard = self.state.write().await;
        let before = guard.rows.len();
        guard.rows.retain(|c| c.name_key() != key);
        Ok(guard.rows.len() != before)
    }

    async fn top_by_gdp(&self, n: usize) -> Result<Vec<Country>, OrbisError> {
        Ok(top_by_gdp(&self.state.read().await.rows, n))
    }

    async fn count_countries(&self) -> Result<u64, OrbisError> {
        Ok(self.state.read().await.rows.len() as u64)
    }

    async fn status(&self) -> Result<Option<StatusRecord>, OrbisError> {
        Ok(self.state.read().await.status)
    }
}
