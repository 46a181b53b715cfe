//! SQLite-backed `CountryStore`.
//!
//! Persists country rows and the refresh status singleton in one SQLite
//! database. A refresh commit runs on a single connection inside one
//! transaction: row upserts, the status advance, and the post-commit count
//! either all land or none do.
//!
//! Usage:
//! ```ignore
//! let store = SqliteCountryStore::connect("sqlite://data/orbis.db").await?;
//! ```
#![warn(missing_docs)]

mod query;
mod rows;
mod schema;
mod status;

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use orbis_core::{
    CommitOutcome, Country, CountryPage, CountryQuery, CountryStore, OrbisError, RefreshBatch,
    RegionMatch, StatusRecord, normalize_name,
};
use rows::{COLUMNS, RowFailure, Written, country_from_row};

/// A durable `CountryStore` backed by a single SQLite database.
#[derive(Clone)]
pub struct SqliteCountryStore {
    pool: SqlitePool,
}

impl SqliteCountryStore {
    /// Open (or create) a database file, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns `Persistence` if the directory, the database, or the schema cannot be created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, OrbisError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(OrbisError::persistence)?;
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);
        Self::with_options(opts, 5).await
    }

    /// Connect using a `sqlite:` URL such as `sqlite://orbis.db` or `sqlite::memory:`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparseable URL and `Persistence` if the
    /// database cannot be opened.
    pub async fn connect(url: &str) -> Result<Self, OrbisError> {
        if !url.starts_with("sqlite:") {
            return Err(OrbisError::InvalidArg(format!(
                "database url must use the sqlite scheme, got '{url}'"
            )));
        }
        let opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| OrbisError::InvalidArg(format!("invalid database url '{url}': {e}")))?
            .create_if_missing(true);
        if url.contains(":memory:") {
            return Self::with_options(opts, 1).await;
        }
        if let Some(parent) = opts.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(OrbisError::persistence)?;
        }
        Self::with_options(opts.journal_mode(SqliteJournalMode::Wal), 5).await
    }

    /// A private in-memory database; gone when the store is dropped.
    ///
    /// # Errors
    /// Returns `Persistence` if SQLite cannot be initialised.
    pub async fn open_in_memory() -> Result<Self, OrbisError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(OrbisError::persistence)?;
        Self::with_options(opts, 1).await
    }

    async fn with_options(opts: SqliteConnectOptions, max: u32) -> Result<Self, OrbisError> {
        // An in-memory database lives as long as its only connection.
        let mut pool = SqlitePoolOptions::new().max_connections(max);
        if max == 1 {
            pool = pool.min_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool
            .connect_with(opts)
            .await
            .map_err(OrbisError::persistence)?;
        sqlx::raw_sql(schema::SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| OrbisError::persistence(format!("schema bootstrap: {e}")))?;
        Ok(Self { pool })
    }

    /// Underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CountryStore for SqliteCountryStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orbis_store::commit_refresh",
            skip(self, batch),
            fields(rows = batch.rows.len(), refreshed_at = %batch.refreshed_at),
        )
    )]
    async fn commit_refresh(&self, batch: &RefreshBatch) -> Result<CommitOutcome, OrbisError> {
        let mut tx = self.pool.begin().await.map_err(OrbisError::persistence)?;
        let mut outcome = CommitOutcome::default();

        for row in &batch.rows {
            match rows::upsert(&mut *tx, row, batch.refreshed_at).await {
                Ok(Written::Inserted) => outcome.inserted += 1,
                Ok(Written::Updated) => outcome.updated += 1,
                Err(RowFailure::Rejected(reason)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(name = %row.name, reason = %reason, "row rejected by store");
                    outcome
                        .row_errors
                        .push(OrbisError::record(row.name.clone(), reason));
                }
                // Dropping `tx` rolls back every earlier upsert.
                Err(RowFailure::Fatal(e)) => return Err(OrbisError::persistence(e)),
            }
        }

        status::mark_refreshed(&mut *tx, batch.refreshed_at)
            .await
            .map_err(OrbisError::persistence)?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&mut *tx)
            .await
            .map_err(OrbisError::persistence)?;
        tx.commit().await.map_err(OrbisError::persistence)?;

        outcome.total = u64::try_from(total).unwrap_or_default();
        Ok(outcome)
    }

    async fn list_countries(
        &self,
        q: &CountryQuery,
        region_match: RegionMatch,
    ) -> Result<CountryPage, OrbisError> {
        let limit = q.effective_limit();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM countries");
        query::push_filters(&mut count, q, region_match);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(OrbisError::persistence)?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM countries"));
        query::push_filters(&mut select, q, region_match);
        select.push(query::order_clause(q.sort, q.effective_order()));
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(q.skip).unwrap_or(i64::MAX));
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(OrbisError::persistence)?;

        Ok(CountryPage {
            items: rows
                .iter()
                .map(country_from_row)
                .collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
            skip: q.skip,
            limit,
        })
    }

    async fn country_by_name(&self, name: &str) -> Result<Option<Country>, OrbisError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM countries WHERE name_key = ?"
        ))
        .bind(normalize_name(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(OrbisError::persistence)?;
        row.as_ref().map(country_from_row).transpose()
    }

    async fn delete_country(&self, name: &str) -> Result<bool, OrbisError> {
        let res = sqlx::query("DELETE FROM countries WHERE name_key = ?")
            .bind(normalize_name(name))
            .execute(&self.pool)
            .await
            .map_err(OrbisError::persistence)?;
        Ok(res.rows_affected() > 0)
    }

    async fn top_by_gdp(&self, n: usize) -> Result<Vec<Country>, OrbisError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM countries \
             ORDER BY (estimated_gdp IS NULL) ASC, estimated_gdp DESC, id ASC LIMIT ?"
        ))
        .bind(i64::try_from(n).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(OrbisError::persistence)?;
        rows.iter().map(country_from_row).collect()
    }

    async fn count_countries(&self) -> Result<u64, OrbisError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await
            .map_err(OrbisError::persistence)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn status(&self) -> Result<Option<StatusRecord>, OrbisError> {
        let mut conn = self.pool.acquire().await.map_err(OrbisError::persistence)?;
        status::read(&mut *conn).await.map_err(OrbisError::persistence)
    }
}
