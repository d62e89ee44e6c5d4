//! Library database operations

use chrono::{DateTime, Utc};
use mpl_common::db::models::Library;
use mpl_common::{Error, Result};
use sqlx::{Row, SqlitePool};

use super::map_unique_violation;

fn library_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Library> {
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| Error::Internal(format!("Invalid timestamp in database: {}", e)))?
        .with_timezone(&Utc);

    Ok(Library {
        id: row.get("id"),
        name: row.get("name"),
        fingerprint: row.get("fingerprint"),
        created_at,
    })
}

/// Insert a new library row
pub async fn create_library(pool: &SqlitePool, name: &str, fingerprint: &str) -> Result<Library> {
    let created_at = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO libraries (name, fingerprint, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(fingerprint)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Library already exists"))?;

    Ok(Library {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        fingerprint: fingerprint.to_string(),
        created_at,
    })
}

/// Look up a library by its whole-subtree fingerprint (the dedup guard)
pub async fn find_library_by_fingerprint(
    pool: &SqlitePool,
    fingerprint: &str,
) -> Result<Option<Library>> {
    let row = sqlx::query("SELECT id, name, fingerprint, created_at FROM libraries WHERE fingerprint = ?")
        .bind(fingerprint)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(library_from_row).transpose()
}

/// Look up a library by id
pub async fn find_library(pool: &SqlitePool, id: i64) -> Result<Option<Library>> {
    let row = sqlx::query("SELECT id, name, fingerprint, created_at FROM libraries WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(library_from_row).transpose()
}

/// All libraries, name-ordered for deterministic listings
pub async fn list_libraries(pool: &SqlitePool) -> Result<Vec<Library>> {
    let rows = sqlx::query("SELECT id, name, fingerprint, created_at FROM libraries ORDER BY name, id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(library_from_row).collect()
}

/// Delete a library; banks, patches, and sequence associations go with it via
/// foreign-key cascade. Returns whether a row was actually removed.
pub async fn delete_library(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM libraries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
