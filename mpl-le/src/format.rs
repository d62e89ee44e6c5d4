//! On-disk library layout
//!
//! ```text
//! <root>/library/
//!   bank01..bank16/
//!     <name>.bank                (raw bytes)
//!     patch01..patch16/
//!       <name>.mmp               (text; optional - absence = default patch)
//!   sequences/
//!     bank01..bank16/
//!       seq01..seq16/
//!         <name>.mmseq           (text; required)
//! ```
//!
//! Directory names are always two-digit zero-padded; anything else is ignored
//! during enumeration.

use std::path::{Path, PathBuf};

pub const BANKS_PER_KIND: i64 = 16;
pub const PATCHES_PER_BANK: i64 = 16;
pub const SEQUENCES_PER_BANK: i64 = 16;

/// 16 patch banks + 16 sequence banks
pub const BANKS_PER_LIBRARY: i64 = 2 * BANKS_PER_KIND;

pub const LIBRARY_DIR: &str = "library";
pub const SEQUENCES_DIR: &str = "sequences";

pub const BANK_DIR_PREFIX: &str = "bank";
pub const PATCH_DIR_PREFIX: &str = "patch";
pub const SEQ_DIR_PREFIX: &str = "seq";

pub const BANK_FILE_EXT: &str = "bank";
pub const PATCH_FILE_EXT: &str = "mmp";
pub const SEQUENCE_FILE_EXT: &str = "mmseq";

/// `bank01`..`bank16`
pub fn bank_dir_name(bank_number: i64) -> String {
    format!("{}{:02}", BANK_DIR_PREFIX, bank_number)
}

/// `patch01`..`patch16`
pub fn patch_dir_name(patch_number: i64) -> String {
    format!("{}{:02}", PATCH_DIR_PREFIX, patch_number)
}

/// `seq01`..`seq16`
pub fn seq_dir_name(sequence_number: i64) -> String {
    format!("{}{:02}", SEQ_DIR_PREFIX, sequence_number)
}

/// Parse a two-digit slot directory name (`bank07`, `patch01`, `seq16`)
///
/// Returns the slot number only for an exact `<prefix><NN>` match with NN in
/// 01..=16; anything else (wrong prefix, one or three digits, out of range)
/// is not a slot directory.
pub fn parse_slot_dir(name: &str, prefix: &str) -> Option<i64> {
    let digits = name.strip_prefix(prefix)?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: i64 = digits.parse().ok()?;
    (1..=16).contains(&number).then_some(number)
}

/// Resolve the effective library root
///
/// Callers may hand either the library root itself or its parent; when
/// `<path>/library` exists as a directory it is the effective root.
pub fn effective_library_root(path: &Path) -> PathBuf {
    let inner = path.join(LIBRARY_DIR);
    if inner.is_dir() {
        inner
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_zero_padded() {
        assert_eq!(bank_dir_name(1), "bank01");
        assert_eq!(bank_dir_name(16), "bank16");
        assert_eq!(patch_dir_name(7), "patch07");
        assert_eq!(seq_dir_name(10), "seq10");
    }

    #[test]
    fn parse_accepts_only_two_digit_slots() {
        assert_eq!(parse_slot_dir("bank01", BANK_DIR_PREFIX), Some(1));
        assert_eq!(parse_slot_dir("bank16", BANK_DIR_PREFIX), Some(16));
        assert_eq!(parse_slot_dir("bank1", BANK_DIR_PREFIX), None);
        assert_eq!(parse_slot_dir("bank001", BANK_DIR_PREFIX), None);
        assert_eq!(parse_slot_dir("bank17", BANK_DIR_PREFIX), None);
        assert_eq!(parse_slot_dir("bank00", BANK_DIR_PREFIX), None);
        assert_eq!(parse_slot_dir("bankxx", BANK_DIR_PREFIX), None);
        assert_eq!(parse_slot_dir("patch03", PATCH_DIR_PREFIX), Some(3));
        assert_eq!(parse_slot_dir("seq09", SEQ_DIR_PREFIX), Some(9));
    }

    #[test]
    fn effective_root_descends_into_library_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(effective_library_root(temp.path()), temp.path());

        std::fs::create_dir(temp.path().join(LIBRARY_DIR)).unwrap();
        assert_eq!(
            effective_library_root(temp.path()),
            temp.path().join(LIBRARY_DIR)
        );
    }
}
