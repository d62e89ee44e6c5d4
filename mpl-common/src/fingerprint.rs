//! Content fingerprinting
//!
//! All identity in MPL is content-derived: libraries and banks hash their
//! whole directory subtree, patches and sequences hash their file content,
//! and default patches get a fingerprint synthesized from their slot
//! coordinates so uniqueness still holds when no file exists.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// SHA-256 of a byte slice, as a lowercase hex string
pub fn fingerprint_bytes(data: impl AsRef<[u8]>) -> String {
    let hash = Sha256::digest(data.as_ref());
    format!("{:x}", hash)
}

/// SHA-256 of an entire directory subtree, as a lowercase hex string
///
/// Enumerates every file under `dir` recursively, sorts the paths
/// lexicographically, and feeds file contents into one digest in that order.
/// Two trees with identical files hash identically regardless of filesystem
/// enumeration order. Any unreadable file aborts the digest with an IO error;
/// a partial digest is never returned.
pub async fn fingerprint_dir(dir: &Path) -> Result<String> {
    let dir = dir.to_path_buf();

    // The walk and reads are synchronous, so run them on the blocking pool.
    tokio::task::spawn_blocking(move || fingerprint_dir_sync(&dir))
        .await
        .map_err(|e| Error::Internal(format!("Fingerprint task failed: {}", e)))?
}

fn fingerprint_dir_sync(dir: &Path) -> Result<String> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let io_err = e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
            });
            Error::Io(io_err)
        })?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();

    let mut hasher = Sha256::new();
    for file in &files {
        let contents = std::fs::read(file)?;
        hasher.update(&contents);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Fingerprint synthesized for a patch slot with no `.mmp` file
pub fn default_patch_fingerprint(bank_id: i64, patch_number: i64) -> String {
    fingerprint_bytes(format!("{}-{}", bank_id, patch_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn known_sha256_vector() {
        assert_eq!(
            fingerprint_bytes("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_input_hashes_to_empty_digest() {
        assert_eq!(
            fingerprint_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn distinct_content_distinct_fingerprints() {
        assert_ne!(fingerprint_bytes("one"), fingerprint_bytes("two"));
    }

    #[tokio::test]
    async fn directory_fingerprint_ignores_creation_order() {
        let a = TempDir::new().unwrap();
        fs::create_dir(a.path().join("sub")).unwrap();
        fs::write(a.path().join("sub/x.txt"), "xx").unwrap();
        fs::write(a.path().join("a.txt"), "aa").unwrap();
        fs::write(a.path().join("b.txt"), "bb").unwrap();

        // Same files, created in a different order.
        let b = TempDir::new().unwrap();
        fs::write(b.path().join("b.txt"), "bb").unwrap();
        fs::create_dir(b.path().join("sub")).unwrap();
        fs::write(b.path().join("sub/x.txt"), "xx").unwrap();
        fs::write(b.path().join("a.txt"), "aa").unwrap();

        let fp_a = fingerprint_dir(a.path()).await.unwrap();
        let fp_b = fingerprint_dir(b.path()).await.unwrap();
        assert_eq!(fp_a, fp_b);
    }

    #[tokio::test]
    async fn directory_fingerprint_changes_with_content() {
        let a = TempDir::new().unwrap();
        fs::write(a.path().join("a.txt"), "aa").unwrap();
        let fp_before = fingerprint_dir(a.path()).await.unwrap();

        fs::write(a.path().join("a.txt"), "changed").unwrap();
        let fp_after = fingerprint_dir(a.path()).await.unwrap();
        assert_ne!(fp_before, fp_after);
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let result = fingerprint_dir(Path::new("/nonexistent/mpl-fingerprint")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn default_fingerprint_depends_on_slot_coordinates() {
        let fp = default_patch_fingerprint(7, 3);
        assert_eq!(fp, fingerprint_bytes("7-3"));
        assert_ne!(fp, default_patch_fingerprint(7, 4));
        assert_ne!(fp, default_patch_fingerprint(8, 3));
    }
}
