//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the schema. Table
//! creation is idempotent (`CREATE TABLE IF NOT EXISTS`) and split into
//! per-table functions so tests can initialize exactly what they need.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Foreign keys are load-bearing: import compensation relies on
    // ON DELETE CASCADE from libraries down to associations.
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers (export/validate) with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all MPL tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_libraries_table(pool).await?;
    create_banks_table(pool).await?;
    create_patches_table(pool).await?;
    create_patch_sequences_table(pool).await?;
    create_bank_sequences_table(pool).await?;
    Ok(())
}

pub async fn create_libraries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS libraries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            fingerprint TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_banks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS banks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            library_id INTEGER NOT NULL
                REFERENCES libraries(id) ON DELETE CASCADE,
            bank_number INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('patch', 'sequence')),
            name TEXT NOT NULL,
            fingerprint TEXT NOT NULL,
            content BLOB,
            UNIQUE (library_id, kind, bank_number)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_patches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bank_id INTEGER NOT NULL
                REFERENCES banks(id) ON DELETE CASCADE,
            patch_number INTEGER NOT NULL,
            name TEXT NOT NULL,
            fingerprint TEXT NOT NULL UNIQUE,
            content TEXT,
            default_patch INTEGER NOT NULL DEFAULT 0,
            favorited INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '[]',
            UNIQUE (bank_id, patch_number)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_patch_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patch_sequences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            fingerprint TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Association table: which banks reference which sequences, at which slot.
/// Content-identical sequences are stored once in patch_sequences and shared.
pub async fn create_bank_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bank_sequences (
            bank_id INTEGER NOT NULL
                REFERENCES banks(id) ON DELETE CASCADE,
            sequence_id INTEGER NOT NULL
                REFERENCES patch_sequences(id),
            sequence_number INTEGER NOT NULL,
            PRIMARY KEY (bank_id, sequence_number)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
