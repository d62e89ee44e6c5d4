//! Patch database operations

use mpl_common::db::models::{decode_tags, encode_tags, Patch};
use mpl_common::Result;
use sqlx::{Row, SqlitePool};

use super::map_unique_violation;

fn patch_from_row(row: &sqlx::sqlite::SqliteRow) -> Patch {
    let tags_raw: String = row.get("tags");
    Patch {
        id: row.get("id"),
        bank_id: row.get("bank_id"),
        patch_number: row.get("patch_number"),
        name: row.get("name"),
        fingerprint: row.get("fingerprint"),
        content: row.get("content"),
        default_patch: row.get("default_patch"),
        favorited: row.get("favorited"),
        tags: decode_tags(&tags_raw),
    }
}

/// Insert a patch row
///
/// The fingerprint column is UNIQUE; inserting content already present
/// anywhere in the store is rejected as a duplicate.
#[allow(clippy::too_many_arguments)]
pub async fn create_patch(
    pool: &SqlitePool,
    bank_id: i64,
    patch_number: i64,
    name: &str,
    fingerprint: &str,
    content: Option<&str>,
    default_patch: bool,
    tags: &[String],
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO patches
            (bank_id, patch_number, name, fingerprint, content, default_patch, favorited, tags)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(bank_id)
    .bind(patch_number)
    .bind(name)
    .bind(fingerprint)
    .bind(content)
    .bind(default_patch)
    .bind(encode_tags(tags))
    .execute(pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            &format!("Duplicate patch fingerprint for patch {patch_number} ({name})"),
        )
    })?;

    Ok(result.last_insert_rowid())
}

/// Patches of a bank in ascending slot order
pub async fn find_patches_by_bank(pool: &SqlitePool, bank_id: i64) -> Result<Vec<Patch>> {
    let rows = sqlx::query(
        r#"
        SELECT id, bank_id, patch_number, name, fingerprint, content,
               default_patch, favorited, tags
        FROM patches
        WHERE bank_id = ?
        ORDER BY patch_number
        "#,
    )
    .bind(bank_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(patch_from_row).collect())
}

/// Toggle the user-facing favorite flag
pub async fn set_favorited(pool: &SqlitePool, patch_id: i64, favorited: bool) -> Result<()> {
    sqlx::query("UPDATE patches SET favorited = ? WHERE id = ?")
        .bind(favorited)
        .bind(patch_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace a patch's tag list
pub async fn set_tags(pool: &SqlitePool, patch_id: i64, tags: &[String]) -> Result<()> {
    sqlx::query("UPDATE patches SET tags = ? WHERE id = ?")
        .bind(encode_tags(tags))
        .bind(patch_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// All favorited patches, slot-ordered within their banks
pub async fn find_favorites(pool: &SqlitePool) -> Result<Vec<Patch>> {
    let rows = sqlx::query(
        r#"
        SELECT id, bank_id, patch_number, name, fingerprint, content,
               default_patch, favorited, tags
        FROM patches
        WHERE favorited = 1
        ORDER BY bank_id, patch_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(patch_from_row).collect())
}
