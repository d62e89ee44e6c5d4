//! Patch sequence database operations
//!
//! Sequence content is stored once per distinct fingerprint; banks reference
//! it through the `bank_sequences` association, which also carries the slot
//! number.

use mpl_common::db::models::{PatchSequence, SequenceSlot};
use mpl_common::Result;
use sqlx::{Row, SqlitePool};

use super::map_unique_violation;

fn sequence_from_row(row: &sqlx::sqlite::SqliteRow) -> PatchSequence {
    PatchSequence {
        id: row.get("id"),
        name: row.get("name"),
        fingerprint: row.get("fingerprint"),
        content: row.get("content"),
    }
}

/// Insert a new sequence row
pub async fn create_sequence(
    pool: &SqlitePool,
    name: &str,
    fingerprint: &str,
    content: &str,
) -> Result<PatchSequence> {
    let result = sqlx::query(
        r#"
        INSERT INTO patch_sequences (name, fingerprint, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(fingerprint)
    .bind(content)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, &format!("Duplicate sequence fingerprint ({name})")))?;

    Ok(PatchSequence {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        fingerprint: fingerprint.to_string(),
        content: content.to_string(),
    })
}

/// Look up existing sequence content for reuse
pub async fn find_sequence_by_fingerprint(
    pool: &SqlitePool,
    fingerprint: &str,
) -> Result<Option<PatchSequence>> {
    let row = sqlx::query("SELECT id, name, fingerprint, content FROM patch_sequences WHERE fingerprint = ?")
        .bind(fingerprint)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(sequence_from_row))
}

/// Record that `bank_id` holds `sequence_id` at slot `sequence_number`
pub async fn associate_sequence_with_bank(
    pool: &SqlitePool,
    bank_id: i64,
    sequence_id: i64,
    sequence_number: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO bank_sequences (bank_id, sequence_id, sequence_number)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(bank_id)
    .bind(sequence_id)
    .bind(sequence_number)
    .execute(pool)
    .await?;
    Ok(())
}

/// Sequences of a bank in ascending slot order
pub async fn find_sequences_by_bank(pool: &SqlitePool, bank_id: i64) -> Result<Vec<SequenceSlot>> {
    let rows = sqlx::query(
        r#"
        SELECT bs.sequence_number, s.id, s.name, s.fingerprint, s.content
        FROM bank_sequences bs
        JOIN patch_sequences s ON s.id = bs.sequence_id
        WHERE bs.bank_id = ?
        ORDER BY bs.sequence_number
        "#,
    )
    .bind(bank_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| SequenceSlot {
            sequence_number: row.get("sequence_number"),
            sequence: sequence_from_row(row),
        })
        .collect())
}

/// Number of distinct sequence content rows in the store
pub async fn count_sequences(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patch_sequences")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
