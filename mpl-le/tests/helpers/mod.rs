//! Test utilities: temp databases and on-disk library fixtures

// Each test binary uses its own subset of these helpers
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tempfile::TempDir;

use mpl_le::Engine;

/// Create a temporary database with the full schema applied
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("test_mpl.db");
    let pool = mpl_common::db::init_database(&db_path)
        .await
        .expect("init test database");
    (temp_dir, pool)
}

/// Engine over a fresh temporary database
pub async fn create_test_engine() -> (TempDir, Engine) {
    let (temp_dir, pool) = create_test_db().await;
    (temp_dir, Engine::new(pool))
}

/// A well-formed library tree on disk
///
/// `<temp>/<name>/library/bank01..16/` each with a `.bank` file and 16 patch
/// dirs holding one `.mmp` each, plus `sequences/bank01..16/seq01..16/` each
/// holding one `.mmseq`. All file contents are unique per slot.
pub struct LibraryFixture {
    _temp: TempDir,
    /// The path handed to import: `<temp>/<name>`
    pub root: PathBuf,
}

impl LibraryFixture {
    pub fn library_dir(&self) -> PathBuf {
        self.root.join("library")
    }

    pub fn bank_dir(&self, bank_number: i64) -> PathBuf {
        self.library_dir().join(format!("bank{:02}", bank_number))
    }

    pub fn patch_dir(&self, bank_number: i64, patch_number: i64) -> PathBuf {
        self.bank_dir(bank_number)
            .join(format!("patch{:02}", patch_number))
    }

    pub fn seq_bank_dir(&self, bank_number: i64) -> PathBuf {
        self.library_dir()
            .join("sequences")
            .join(format!("bank{:02}", bank_number))
    }

    pub fn seq_dir(&self, bank_number: i64, sequence_number: i64) -> PathBuf {
        self.seq_bank_dir(bank_number)
            .join(format!("seq{:02}", sequence_number))
    }

    /// Remove the `.bank` file of a bank
    pub fn remove_bank_file(&self, bank_number: i64) {
        remove_only_file(&self.bank_dir(bank_number));
    }

    /// Remove the `.mmp` file of a patch slot, leaving the directory
    pub fn remove_patch_file(&self, bank_number: i64, patch_number: i64) {
        remove_only_file(&self.patch_dir(bank_number, patch_number));
    }

    /// Remove the `.mmseq` file of a sequence slot, leaving the directory
    pub fn remove_sequence_file(&self, bank_number: i64, sequence_number: i64) {
        remove_only_file(&self.seq_dir(bank_number, sequence_number));
    }

    /// Overwrite a sequence slot's `.mmseq` content
    pub fn write_sequence_content(&self, bank_number: i64, sequence_number: i64, content: &str) {
        let dir = self.seq_dir(bank_number, sequence_number);
        let file = only_file(&dir);
        fs::write(file, content).expect("overwrite sequence file");
    }

    /// Overwrite a patch slot's `.mmp` content
    pub fn write_patch_content(&self, bank_number: i64, patch_number: i64, content: &str) {
        let dir = self.patch_dir(bank_number, patch_number);
        let file = only_file(&dir);
        fs::write(file, content).expect("overwrite patch file");
    }
}

/// Build a complete, well-formed library fixture named `name`
pub fn full_library(name: &str) -> LibraryFixture {
    let temp = TempDir::new().expect("create fixture dir");
    let root = temp.path().join(name);
    let library_dir = root.join("library");

    for bank in 1..=16 {
        let bank_dir = library_dir.join(format!("bank{:02}", bank));
        fs::create_dir_all(&bank_dir).expect("create bank dir");
        fs::write(
            bank_dir.join(format!("Factory {:02}.bank", bank)),
            format!("bank payload {:02}", bank),
        )
        .expect("write bank file");

        for patch in 1..=16 {
            let patch_dir = bank_dir.join(format!("patch{:02}", patch));
            fs::create_dir_all(&patch_dir).expect("create patch dir");
            fs::write(
                patch_dir.join(format!("Patch {:02}-{:02}.mmp", bank, patch)),
                format!("mmp content {:02}-{:02}", bank, patch),
            )
            .expect("write patch file");
        }
    }

    for bank in 1..=16 {
        for seq in 1..=16 {
            let seq_dir = library_dir
                .join("sequences")
                .join(format!("bank{:02}", bank))
                .join(format!("seq{:02}", seq));
            fs::create_dir_all(&seq_dir).expect("create seq dir");
            fs::write(
                seq_dir.join(format!("Seq {:02}-{:02}.mmseq", bank, seq)),
                format!("mmseq content {:02}-{:02}", bank, seq),
            )
            .expect("write sequence file");
        }
    }

    LibraryFixture { _temp: temp, root }
}

fn only_file(dir: &Path) -> PathBuf {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.is_file())
        .expect("directory has a file")
}

fn remove_only_file(dir: &Path) {
    fs::remove_file(only_file(dir)).expect("remove file");
}
