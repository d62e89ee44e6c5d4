//! mpl-le - MPL Library Engine
//!
//! Converts patch libraries between their fixed on-disk directory format and
//! the relational model, and validates candidate trees against the format.
//! Three operations make up the caller-facing surface: import (all-or-nothing
//! ingestion with fingerprint dedup), export (byte-faithful reconstruction),
//! and validate (read-only conformance report).

pub mod db;
pub mod format;
pub mod models;
pub mod services;

pub use models::{ExportOutcome, ImportCounts, ImportOutcome, ValidationReport};

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use mpl_common::db::models::Library;
use mpl_common::{Error, Result};

/// Engine entry point owning the database handle
///
/// Holds the per-process import lock: concurrent imports are serialized here,
/// and the fingerprint uniqueness constraint turns any cross-process race
/// into a rejected duplicate rather than corrupted state. Export and validate
/// take no lock; they are read-only over the relational model.
#[derive(Clone)]
pub struct Engine {
    db: SqlitePool,
    import_lock: Arc<Mutex<()>>,
}

impl Engine {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            import_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    /// Import the library tree rooted at `path`
    pub async fn import_library(&self, path: &Path) -> ImportOutcome {
        let _guard = self.import_lock.lock().await;
        services::LibraryImporter::new(self.db.clone())
            .import(path)
            .await
    }

    /// Export library `library_id` into `target_dir`
    pub async fn export_library(&self, library_id: i64, target_dir: &Path) -> ExportOutcome {
        services::LibraryExporter::new(self.db.clone())
            .export(library_id, target_dir)
            .await
    }

    /// Validate the library tree rooted at `path` (no database access)
    pub fn validate_library(&self, path: &Path) -> ValidationReport {
        services::validate(path)
    }

    /// All imported libraries, name-ordered
    pub async fn list_libraries(&self) -> Result<Vec<Library>> {
        db::libraries::list_libraries(&self.db).await
    }

    /// Delete a library and everything it owns
    pub async fn delete_library(&self, library_id: i64) -> Result<()> {
        if db::libraries::delete_library(&self.db, library_id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Library not found".to_string()))
        }
    }
}
