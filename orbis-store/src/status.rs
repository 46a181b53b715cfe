//! The `api_status` singleton.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};

use orbis_core::StatusRecord;

pub(crate) async fn read(conn: &mut SqliteConnection) -> Result<Option<StatusRecord>, sqlx::Error> {
    let row = sqlx::query("SELECT last_updated FROM api_status WHERE id = 1")
        .fetch_optional(&mut *conn)
        .await?;
    row.map(|r| {
        Ok(StatusRecord {
            last_updated: r.try_get::<DateTime<Utc>, _>("last_updated")?,
        })
    })
    .transpose()
}

/// Create-or-advance the singleton. Returns the value stored afterwards.
///
/// Must run on the refresh transaction's connection so the status moves
/// together with the row upserts.
pub(crate) async fn mark_refreshed(
    conn: &mut SqliteConnection,
    at: DateTime<Utc>,
) -> Result<DateTime<Utc>, sqlx::Error> {
    match read(conn).await? {
        Some(current) if current.last_updated >= at => Ok(current.last_updated),
        Some(_) => {
            sqlx::query("UPDATE api_status SET last_updated = ? WHERE id = 1")
                .bind(at)
                .execute(&mut *conn)
                .await?;
            Ok(at)
        }
        None => {
            sqlx::query("INSERT INTO api_status (id, last_updated) VALUES (1, ?)")
                .bind(at)
                .execute(&mut *conn)
                .await?;
            Ok(at)
        }
    }
}
