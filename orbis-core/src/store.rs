use async_trait::async_trait;

use crate::reconcile::RefreshBatch;
use orbis_types::{Country, CountryPage, CountryQuery, OrbisError, RegionMatch, StatusRecord};

/// Write counts of one committed refresh batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitOutcome {
    /// Rows created.
    pub inserted: u64,
    /// Existing rows overwritten.
    pub updated: u64,
    /// Row count after the commit, read inside the same transaction.
    pub total: u64,
    /// Rows the store refused individually (e.g. constraint violations).
    /// Their siblings were still committed.
    pub row_errors: Vec<OrbisError>,
}

/// Persistence contract for country rows and the status singleton.
///
/// Implementations must make [`commit_refresh`](CountryStore::commit_refresh)
/// atomic: either every accepted row and the status advance land, or nothing
/// does. Readers may run concurrently with a commit and observe either the
/// state before it or after it.
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Upsert every row by normalized name, stamp them with
    /// `batch.refreshed_at`, and advance the status record, in one transaction.
    ///
    /// The status timestamp only moves forward: an older `refreshed_at`
    /// leaves it unchanged.
    async fn commit_refresh(&self, batch: &RefreshBatch) -> Result<CommitOutcome, OrbisError>;

    /// One page of rows matching `query`.
    async fn list_countries(
        &self,
        query: &CountryQuery,
        region_match: RegionMatch,
    ) -> Result<CountryPage, OrbisError>;

    /// Case-insensitive lookup by name.
    async fn country_by_name(&self, name: &str) -> Result<Option<Country>, OrbisError>;

    /// Case-insensitive delete by name. Returns whether a row was removed.
    async fn delete_country(&self, name: &str) -> Result<bool, OrbisError>;

    /// The `n` rows with the largest GDP estimate; rows without one come last.
    async fn top_by_gdp(&self, n: usize) -> Result<Vec<Country>, OrbisError>;

    /// Total row count.
    async fn count_countries(&self) -> Result<u64, OrbisError>;

    /// The status singleton, or `None` before the first successful refresh.
    async fn status(&self) -> Result<Option<StatusRecord>, OrbisError>;
}
