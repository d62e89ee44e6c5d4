//! Export pipeline integration tests

mod helpers;

use std::fs;
use std::path::Path;

use helpers::{create_test_engine, full_library};
use tempfile::TempDir;

#[tokio::test]
async fn exporting_unknown_library_reports_not_found() {
    let (_db_dir, engine) = create_test_engine().await;
    let target = TempDir::new().unwrap();

    let outcome = engine.export_library(999, target.path()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Library not found"));
}

#[tokio::test]
async fn export_reproduces_the_imported_tree_byte_for_byte() {
    let (_db_dir, engine) = create_test_engine().await;
    let fixture = full_library("RoundTrip");

    let imported = engine.import_library(&fixture.root).await;
    assert!(imported.success, "{:?}", imported.message);
    let library_id = imported.library_id.unwrap();

    let target = TempDir::new().unwrap();
    let exported = engine.export_library(library_id, target.path()).await;
    assert!(exported.success, "{:?}", exported.message);

    let export_root = exported.export_path.unwrap();
    assert_eq!(export_root, target.path().join("RoundTrip"));
    let exported_library = export_root.join("library");

    for bank in 1..=16 {
        let bank_dir_name = format!("bank{:02}", bank);

        // Bank payload
        assert_file_eq(
            &fixture.library_dir().join(&bank_dir_name).join(format!("Factory {:02}.bank", bank)),
            &exported_library.join(&bank_dir_name).join(format!("Factory {:02}.bank", bank)),
        );

        // Patches
        for patch in 1..=16 {
            let rel = format!(
                "{}/patch{:02}/Patch {:02}-{:02}.mmp",
                bank_dir_name, patch, bank, patch
            );
            assert_file_eq(
                &fixture.library_dir().join(&rel),
                &exported_library.join(&rel),
            );
        }

        // Sequences
        for seq in 1..=16 {
            let rel = format!(
                "sequences/{}/seq{:02}/Seq {:02}-{:02}.mmseq",
                bank_dir_name, seq, bank, seq
            );
            assert_file_eq(
                &fixture.library_dir().join(&rel),
                &exported_library.join(&rel),
            );
        }
    }
}

#[tokio::test]
async fn exported_tree_reimports_as_a_duplicate() {
    // The exported tree hashes identically to the source, so the dedup guard
    // must reject it.
    let (_db_dir, engine) = create_test_engine().await;
    let fixture = full_library("RoundTrip");

    let imported = engine.import_library(&fixture.root).await;
    assert!(imported.success);

    let target = TempDir::new().unwrap();
    let exported = engine
        .export_library(imported.library_id.unwrap(), target.path())
        .await;
    assert!(exported.success);

    let reimported = engine.import_library(&exported.export_path.unwrap()).await;
    assert!(!reimported.success);
    assert!(reimported
        .message
        .as_deref()
        .unwrap_or_default()
        .contains("already exists"));
}

#[tokio::test]
async fn default_patches_export_as_empty_directories() {
    let (_db_dir, engine) = create_test_engine().await;
    let fixture = full_library("Sparse");
    fixture.remove_patch_file(6, 11);

    let imported = engine.import_library(&fixture.root).await;
    assert!(imported.success, "{:?}", imported.message);

    let target = TempDir::new().unwrap();
    let exported = engine
        .export_library(imported.library_id.unwrap(), target.path())
        .await;
    assert!(exported.success, "{:?}", exported.message);

    let patch_dir = exported
        .export_path
        .unwrap()
        .join("library/bank06/patch11");
    assert!(patch_dir.is_dir());
    assert_eq!(fs::read_dir(&patch_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn wrong_bank_count_fails_the_export() {
    let (_db_dir, engine) = create_test_engine().await;
    let fixture = full_library("Tampered");

    let imported = engine.import_library(&fixture.root).await;
    assert!(imported.success);
    let library_id = imported.library_id.unwrap();

    // Tamper with the store behind the engine's back
    sqlx::query("DELETE FROM banks WHERE library_id = ? AND kind = 'patch' AND bank_number = 16")
        .bind(library_id)
        .execute(engine.db())
        .await
        .unwrap();

    let target = TempDir::new().unwrap();
    let outcome = engine.export_library(library_id, target.path()).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.message.as_deref(),
        Some("Invalid number of banks found")
    );
}

fn assert_file_eq(expected: &Path, actual: &Path) {
    let expected_bytes = fs::read(expected)
        .unwrap_or_else(|e| panic!("read {}: {}", expected.display(), e));
    let actual_bytes =
        fs::read(actual).unwrap_or_else(|e| panic!("read {}: {}", actual.display(), e));
    assert_eq!(
        expected_bytes,
        actual_bytes,
        "content mismatch: {} vs {}",
        expected.display(),
        actual.display()
    );
}
