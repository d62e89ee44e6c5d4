//! Library import pipeline
//!
//! Materializes a library tree into the relational model exactly once,
//! all-or-nothing from the caller's perspective. Structure is checked before
//! the first write; the whole-subtree fingerprint guards against importing an
//! unmodified library twice; any failure after the library row exists deletes
//! it again, and the foreign-key cascade takes the partial banks, patches,
//! and sequence associations with it.
//!
//! Banks and slots are processed strictly in ascending numeric order.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use mpl_common::db::models::BankKind;
use mpl_common::fingerprint::{default_patch_fingerprint, fingerprint_bytes, fingerprint_dir};
use mpl_common::{Error, Result};

use crate::db::{banks, libraries, patches, sequences};
use crate::format::{
    self, BANKS_PER_KIND, BANK_FILE_EXT, PATCHES_PER_BANK, PATCH_FILE_EXT, SEQUENCES_DIR,
    SEQUENCES_PER_BANK, SEQUENCE_FILE_EXT,
};
use crate::models::{ImportCounts, ImportOutcome};
use crate::services::tagger;

/// Name given to patch slots that had no `.mmp` file at import time
const DEFAULT_PATCH_NAME: &str = "Default Patch";

/// Library import pipeline
pub struct LibraryImporter {
    db: SqlitePool,
}

impl LibraryImporter {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Import the library tree rooted at `root`
    ///
    /// Failures are reported through the outcome object; this never panics
    /// and never leaves a partially imported library behind.
    pub async fn import(&self, root: &Path) -> ImportOutcome {
        info!(path = %root.display(), "Importing library");

        match self.run(root).await {
            Ok((library_id, counts)) => {
                info!(
                    library_id,
                    banks = counts.banks,
                    patches = counts.patches,
                    sequences = counts.sequences,
                    "Library imported"
                );
                ImportOutcome::ok(library_id, counts)
            }
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Library import failed");
                ImportOutcome::failed(e.to_string())
            }
        }
    }

    async fn run(&self, root: &Path) -> Result<(i64, ImportCounts)> {
        let library_dir = format::effective_library_root(root);

        // Pre-flight: nothing below may touch the database until the tree
        // shape has been confirmed.
        self.preflight(&library_dir).await?;

        let fingerprint = fingerprint_dir(&library_dir).await?;
        if libraries::find_library_by_fingerprint(&self.db, &fingerprint)
            .await?
            .is_some()
        {
            return Err(Error::Duplicate("Library already exists".to_string()));
        }

        let library_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format::LIBRARY_DIR.to_string());

        let library = libraries::create_library(&self.db, &library_name, &fingerprint).await?;
        debug!(library_id = library.id, name = %library_name, "Created library row");

        match self.populate(library.id, &library_dir).await {
            Ok(counts) => Ok((library.id, counts)),
            Err(e) => {
                warn!(
                    library_id = library.id,
                    error = %e,
                    "Import failed mid-pipeline, rolling back library"
                );
                if let Err(delete_err) = libraries::delete_library(&self.db, library.id).await {
                    error!(
                        library_id = library.id,
                        error = %delete_err,
                        "Rollback failed, orphaned library left behind"
                    );
                }
                Err(e)
            }
        }
    }

    /// Verify every required directory exists before the first write
    async fn preflight(&self, library_dir: &Path) -> Result<()> {
        require_directory(library_dir).await?;

        for bank_number in 1..=BANKS_PER_KIND {
            require_directory(&library_dir.join(format::bank_dir_name(bank_number))).await?;
        }

        let sequences_dir = library_dir.join(SEQUENCES_DIR);
        require_directory(&sequences_dir).await?;
        for bank_number in 1..=BANKS_PER_KIND {
            require_directory(&sequences_dir.join(format::bank_dir_name(bank_number))).await?;
        }

        Ok(())
    }

    async fn populate(&self, library_id: i64, library_dir: &Path) -> Result<ImportCounts> {
        let mut counts = ImportCounts {
            libraries: 1,
            ..Default::default()
        };

        for bank_number in 1..=BANKS_PER_KIND {
            self.import_patch_bank(library_id, library_dir, bank_number, &mut counts)
                .await?;
        }

        let sequences_dir = library_dir.join(SEQUENCES_DIR);
        for bank_number in 1..=BANKS_PER_KIND {
            self.import_sequence_bank(library_id, &sequences_dir, bank_number, &mut counts)
                .await?;
        }

        Ok(counts)
    }

    async fn import_patch_bank(
        &self,
        library_id: i64,
        library_dir: &Path,
        bank_number: i64,
        counts: &mut ImportCounts,
    ) -> Result<()> {
        let bank_dir = library_dir.join(format::bank_dir_name(bank_number));

        let bank_file = find_file_with_extension(&bank_dir, BANK_FILE_EXT)
            .await?
            .ok_or_else(|| {
                Error::Structural(format!(
                    "Missing .bank file in directory: {}",
                    bank_dir.display()
                ))
            })?;

        let bank_content = tokio::fs::read(&bank_file).await?;
        let bank_name = file_stem(&bank_file);
        let bank_fingerprint = fingerprint_dir(&bank_dir).await?;

        let bank = banks::create_bank(
            &self.db,
            library_id,
            bank_number,
            BankKind::Patch,
            &bank_name,
            &bank_fingerprint,
            Some(&bank_content),
        )
        .await?;
        counts.banks += 1;

        for patch_number in 1..=PATCHES_PER_BANK {
            let patch_dir = bank_dir.join(format::patch_dir_name(patch_number));
            let mmp_file = if patch_dir.is_dir() {
                find_file_with_extension(&patch_dir, PATCH_FILE_EXT).await?
            } else {
                None
            };

            match mmp_file {
                Some(path) => {
                    let content = tokio::fs::read_to_string(&path).await?;
                    let patch_name = file_stem(&path);
                    let tags = tagger::implicit_tags(&patch_name, &bank_name);
                    patches::create_patch(
                        &self.db,
                        bank.id,
                        patch_number,
                        &patch_name,
                        &fingerprint_bytes(&content),
                        Some(&content),
                        false,
                        &tags,
                    )
                    .await?;
                }
                None => {
                    // No .mmp file for this slot: synthesize a default patch
                    patches::create_patch(
                        &self.db,
                        bank.id,
                        patch_number,
                        DEFAULT_PATCH_NAME,
                        &default_patch_fingerprint(bank.id, patch_number),
                        None,
                        true,
                        &[],
                    )
                    .await?;
                }
            }
            counts.patches += 1;
        }

        Ok(())
    }

    async fn import_sequence_bank(
        &self,
        library_id: i64,
        sequences_dir: &Path,
        bank_number: i64,
        counts: &mut ImportCounts,
    ) -> Result<()> {
        let system_name = format::bank_dir_name(bank_number);
        let bank_dir = sequences_dir.join(&system_name);
        let bank_fingerprint = fingerprint_dir(&bank_dir).await?;

        // Sequence banks carry no .bank file; the system name stands in.
        let bank = banks::create_bank(
            &self.db,
            library_id,
            bank_number,
            BankKind::Sequence,
            &system_name,
            &bank_fingerprint,
            None,
        )
        .await?;
        counts.banks += 1;

        for sequence_number in 1..=SEQUENCES_PER_BANK {
            let seq_dir_name = format::seq_dir_name(sequence_number);
            let seq_dir = bank_dir.join(&seq_dir_name);
            let mmseq_file = if seq_dir.is_dir() {
                find_file_with_extension(&seq_dir, SEQUENCE_FILE_EXT).await?
            } else {
                None
            };

            let path = mmseq_file.ok_or_else(|| {
                Error::Structural(format!(
                    "Missing required .mmseq file in sequence directory: {} in sequence bank {}",
                    seq_dir_name, system_name
                ))
            })?;

            let content = tokio::fs::read_to_string(&path).await?;
            let fingerprint = fingerprint_bytes(&content);

            // Identical content anywhere in the store is reused, not duplicated
            let sequence = match sequences::find_sequence_by_fingerprint(&self.db, &fingerprint)
                .await?
            {
                Some(existing) => {
                    debug!(
                        sequence_id = existing.id,
                        bank = %system_name,
                        slot = sequence_number,
                        "Reusing existing sequence content"
                    );
                    existing
                }
                None => {
                    let name = file_stem(&path);
                    sequences::create_sequence(&self.db, &name, &fingerprint, &content).await?
                }
            };

            sequences::associate_sequence_with_bank(&self.db, bank.id, sequence.id, sequence_number)
                .await?;
            counts.sequences += 1;
        }

        Ok(())
    }
}

async fn require_directory(dir: &Path) -> Result<()> {
    let is_dir = tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(Error::Structural(format!(
            "Missing required directory: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Lexicographically first file in `dir` with the given extension
async fn find_file_with_extension(dir: &Path, ext: &str) -> Result<Option<PathBuf>> {
    let mut matches: Vec<PathBuf> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
