//! Bank database operations

use mpl_common::db::models::{Bank, BankKind};
use mpl_common::Result;
use sqlx::{Row, SqlitePool};

fn bank_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Bank> {
    let kind_str: String = row.get("kind");
    Ok(Bank {
        id: row.get("id"),
        library_id: row.get("library_id"),
        bank_number: row.get("bank_number"),
        kind: kind_str.parse()?,
        name: row.get("name"),
        fingerprint: row.get("fingerprint"),
        content: row.get("content"),
    })
}

/// Insert a bank row and return it with its assigned id
pub async fn create_bank(
    pool: &SqlitePool,
    library_id: i64,
    bank_number: i64,
    kind: BankKind,
    name: &str,
    fingerprint: &str,
    content: Option<&[u8]>,
) -> Result<Bank> {
    let result = sqlx::query(
        r#"
        INSERT INTO banks (library_id, bank_number, kind, name, fingerprint, content)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(library_id)
    .bind(bank_number)
    .bind(kind.as_str())
    .bind(name)
    .bind(fingerprint)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(Bank {
        id: result.last_insert_rowid(),
        library_id,
        bank_number,
        kind,
        name: name.to_string(),
        fingerprint: fingerprint.to_string(),
        content: content.map(|c| c.to_vec()),
    })
}

/// All banks of a library: patch banks first, then sequence banks, each in
/// ascending bank_number order (the canonical ordering)
pub async fn find_banks_by_library(pool: &SqlitePool, library_id: i64) -> Result<Vec<Bank>> {
    let rows = sqlx::query(
        r#"
        SELECT id, library_id, bank_number, kind, name, fingerprint, content
        FROM banks
        WHERE library_id = ?
        ORDER BY kind, bank_number
        "#,
    )
    .bind(library_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(bank_from_row).collect()
}
