use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use orbis_core::{Country, CountryUpsert, OrbisError};

pub(crate) const COLUMNS: &str = "id, name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

pub(crate) fn country_from_row(r: &SqliteRow) -> Result<Country, OrbisError> {
    let population: i64 = r.try_get("population").map_err(OrbisError::persistence)?;
    Ok(Country {
        id: r.try_get("id").map_err(OrbisError::persistence)?,
        name: r.try_get("name").map_err(OrbisError::persistence)?,
        capital: r.try_get("capital").map_err(OrbisError::persistence)?,
        region: r.try_get("region").map_err(OrbisError::persistence)?,
        population: u64::try_from(population).map_err(|_| {
            OrbisError::persistence(format!("negative population {population} in storage"))
        })?,
        currency_code: r.try_get("currency_code").map_err(OrbisError::persistence)?,
        exchange_rate: r.try_get("exchange_rate").map_err(OrbisError::persistence)?,
        estimated_gdp: r.try_get("estimated_gdp").map_err(OrbisError::persistence)?,
        flag_url: r.try_get("flag_url").map_err(OrbisError::persistence)?,
        last_refreshed_at: r
            .try_get::<DateTime<Utc>, _>("last_refreshed_at")
            .map_err(OrbisError::persistence)?,
    })
}

pub(crate) enum Written {
    Inserted,
    Updated,
}

/// A row failed on its own (bad value, constraint) or the connection failed.
pub(crate) enum RowFailure {
    Rejected(String),
    Fatal(sqlx::Error),
}

impl From<sqlx::Error> for RowFailure {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if is_row_level(db.kind()) => Self::Rejected(db.to_string()),
            _ => Self::Fatal(e),
        }
    }
}

const fn is_row_level(kind: sqlx::error::ErrorKind) -> bool {
    matches!(
        kind,
        sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation
            | sqlx::error::ErrorKind::ForeignKeyViolation
    )
}

/// Update the row matching `row.name_key()` or insert a new one.
///
/// SQLite aborts only the failing statement on a constraint violation, so a
/// rejected row leaves the surrounding transaction usable.
pub(crate) async fn upsert(
    conn: &mut SqliteConnection,
    row: &CountryUpsert,
    refreshed_at: DateTime<Utc>,
) -> Result<Written, RowFailure> {
    let population = i64::try_from(row.population).map_err(|_| {
        RowFailure::Rejected(format!("population {} exceeds storage range", row.population))
    })?;
    let key = row.name_key();
    let region_key = row.region.as_deref().map(str::to_lowercase);

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM countries WHERE name_key = ?")
        .bind(&key)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        sqlx::query(
            "UPDATE countries SET name = ?, capital = ?, region = ?, region_key = ?, \
             population = ?, currency_code = ?, exchange_rate = ?, estimated_gdp = ?, \
             flag_url = ?, last_refreshed_at = ? WHERE id = ?",
        )
        .bind(&row.name)
        .bind(&row.capital)
        .bind(&row.region)
        .bind(&region_key)
        .bind(population)
        .bind(&row.currency_code)
        .bind(row.exchange_rate)
        .bind(row.estimated_gdp)
        .bind(&row.flag_url)
        .bind(refreshed_at)
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(Written::Updated)
    } else {
        sqlx::query(
            "INSERT INTO countries (name, name_key, capital, region, region_key, population, \
             currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.name)
        .bind(&key)
        .bind(&row.capital)
        .bind(&row.region)
        .bind(&region_key)
        .bind(population)
        .bind(&row.currency_code)
        .bind(row.exchange_rate)
        .bind(row.estimated_gdp)
        .bind(&row.flag_url)
        .bind(refreshed_at)
        .execute(&mut *conn)
        .await?;
        Ok(Written::Inserted)
    }
}
