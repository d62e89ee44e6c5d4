//! Library export pipeline
//!
//! Reconstructs the on-disk tree from a library's relational state so that
//! re-importing the written tree reproduces equivalent content. Slot counts
//! are checked before writing each bank. Unlike import, a mid-export failure
//! leaves already-written files in place; the caller gets the failure message
//! and the partial tree.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::{info, warn};

use mpl_common::db::models::{Bank, BankKind};
use mpl_common::{Error, Result};

use crate::db::{banks, libraries, patches, sequences};
use crate::format::{
    self, BANKS_PER_LIBRARY, BANK_FILE_EXT, LIBRARY_DIR, PATCHES_PER_BANK, PATCH_FILE_EXT,
    SEQUENCES_DIR, SEQUENCES_PER_BANK, SEQUENCE_FILE_EXT,
};
use crate::models::ExportOutcome;

/// Library export pipeline
pub struct LibraryExporter {
    db: SqlitePool,
}

impl LibraryExporter {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Export library `library_id` under `target_dir`
    pub async fn export(&self, library_id: i64, target_dir: &Path) -> ExportOutcome {
        info!(library_id, target = %target_dir.display(), "Exporting library");

        match self.run(library_id, target_dir).await {
            Ok(export_path) => {
                info!(library_id, path = %export_path.display(), "Library exported");
                ExportOutcome::ok(export_path)
            }
            Err(e) => {
                warn!(library_id, error = %e, "Library export failed");
                ExportOutcome::failed(e.to_string())
            }
        }
    }

    async fn run(&self, library_id: i64, target_dir: &Path) -> Result<PathBuf> {
        let library = libraries::find_library(&self.db, library_id)
            .await?
            .ok_or_else(|| Error::NotFound("Library not found".to_string()))?;

        let library_dir = target_dir.join(&library.name);
        let inner_dir = library_dir.join(LIBRARY_DIR);
        let sequences_dir = inner_dir.join(SEQUENCES_DIR);
        tokio::fs::create_dir_all(&sequences_dir).await?;

        let all_banks = banks::find_banks_by_library(&self.db, library_id).await?;
        if all_banks.len() as i64 != BANKS_PER_LIBRARY {
            return Err(Error::Integrity("Invalid number of banks found".to_string()));
        }

        for bank in all_banks.iter().filter(|b| b.kind == BankKind::Patch) {
            self.export_patch_bank(bank, &inner_dir).await?;
        }

        for bank in all_banks.iter().filter(|b| b.kind == BankKind::Sequence) {
            self.export_sequence_bank(bank, &sequences_dir).await?;
        }

        Ok(library_dir)
    }

    async fn export_patch_bank(&self, bank: &Bank, inner_dir: &Path) -> Result<()> {
        let system_name = format::bank_dir_name(bank.bank_number);
        let bank_dir = inner_dir.join(&system_name);
        tokio::fs::create_dir_all(&bank_dir).await?;

        let content = bank.content.as_deref().ok_or_else(|| {
            Error::Integrity(format!("Missing bank content for {}", system_name))
        })?;
        let bank_file = bank_dir.join(format!("{}.{}", bank.name, BANK_FILE_EXT));
        tokio::fs::write(&bank_file, content).await?;

        let bank_patches = patches::find_patches_by_bank(&self.db, bank.id).await?;
        if bank_patches.len() as i64 != PATCHES_PER_BANK {
            return Err(Error::Integrity(format!(
                "Invalid number of patches found in bank {}",
                system_name
            )));
        }

        for patch in &bank_patches {
            let patch_dir = bank_dir.join(format::patch_dir_name(patch.patch_number));
            tokio::fs::create_dir_all(&patch_dir).await?;

            // Default patches stay an empty directory, matching what import
            // accepted.
            if !patch.default_patch {
                if let Some(content) = &patch.content {
                    let patch_file = patch_dir.join(format!("{}.{}", patch.name, PATCH_FILE_EXT));
                    tokio::fs::write(&patch_file, content).await?;
                }
            }
        }

        Ok(())
    }

    async fn export_sequence_bank(&self, bank: &Bank, sequences_dir: &Path) -> Result<()> {
        let system_name = format::bank_dir_name(bank.bank_number);
        let bank_dir = sequences_dir.join(&system_name);
        tokio::fs::create_dir_all(&bank_dir).await?;

        let slots = sequences::find_sequences_by_bank(&self.db, bank.id).await?;
        if slots.len() as i64 != SEQUENCES_PER_BANK {
            return Err(Error::Integrity(format!(
                "Invalid number of sequences found in bank {}",
                system_name
            )));
        }

        for slot in &slots {
            let seq_dir = bank_dir.join(format::seq_dir_name(slot.sequence_number));
            tokio::fs::create_dir_all(&seq_dir).await?;

            let seq_file = seq_dir.join(format!("{}.{}", slot.sequence.name, SEQUENCE_FILE_EXT));
            tokio::fs::write(&seq_file, &slot.sequence.content).await?;
        }

        Ok(())
    }
}
