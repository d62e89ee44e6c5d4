//! Library schema validation
//!
//! Read-only structural conformance check over a candidate library tree.
//! Never touches the database and never returns an error: every problem is
//! reported through the returned [`ValidationReport`]. Missing `.bank` and
//! `.mmseq` files are errors; missing patch files and missing slot
//! directories are recorded and warned about but tolerated, since import
//! fills absent patches with defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::format::{
    self, BANKS_PER_KIND, BANK_DIR_PREFIX, BANK_FILE_EXT, PATCHES_PER_BANK, PATCH_DIR_PREFIX,
    PATCH_FILE_EXT, SEQUENCES_DIR, SEQUENCES_PER_BANK, SEQUENCE_FILE_EXT, SEQ_DIR_PREFIX,
};
use crate::models::ValidationReport;

/// Validate a candidate library directory
pub fn validate(path: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !path.exists() {
        report
            .errors
            .push(format!("Library directory does not exist: {}", path.display()));
        return report;
    }

    let root = format::effective_library_root(path);
    if let Err(e) = validate_tree(&root, &mut report) {
        report.errors.push(format!("Error validating library: {}", e));
    }

    report.is_valid = report.errors.is_empty();
    report
}

fn validate_tree(root: &Path, report: &mut ValidationReport) -> io::Result<()> {
    validate_banks(root, report)?;
    validate_sequences(root, report)
}

fn validate_banks(root: &Path, report: &mut ValidationReport) -> io::Result<()> {
    let banks = slot_dirs(root, BANK_DIR_PREFIX)?;
    report.details.bank_count = banks.len() as u32;

    for number in 1..=BANKS_PER_KIND {
        if !banks.iter().any(|(n, _)| *n == number) {
            report.details.missing_banks.push(format::bank_dir_name(number));
        }
    }
    if !report.details.missing_banks.is_empty() {
        report.warnings.push(format!(
            "{} of {} bank directories are missing",
            report.details.missing_banks.len(),
            BANKS_PER_KIND
        ));
    }

    for (bank_number, bank_path) in &banks {
        validate_bank_file(*bank_number, bank_path, report)?;
        validate_patches(*bank_number, bank_path, report)?;
    }

    Ok(())
}

fn validate_bank_file(
    bank_number: i64,
    bank_path: &Path,
    report: &mut ValidationReport,
) -> io::Result<()> {
    let bank_files = files_with_extension(bank_path, BANK_FILE_EXT)?;

    match bank_files.first() {
        None => {
            report
                .errors
                .push(format!("Bank {} is missing its .bank file", bank_number));
        }
        Some(file_name) => {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if stem.is_empty() || stem.contains('/') || stem.contains('\\') {
                report.errors.push(format!(
                    "Invalid bank file name in bank {}: {}",
                    bank_number, stem
                ));
                report.details.invalid_names.push(stem.to_string());
            }
        }
    }

    Ok(())
}

fn validate_patches(
    bank_number: i64,
    bank_path: &Path,
    report: &mut ValidationReport,
) -> io::Result<()> {
    let patch_dirs = slot_dirs(bank_path, PATCH_DIR_PREFIX)?;
    report.details.patch_count += patch_dirs.len() as u32;

    for number in 1..=PATCHES_PER_BANK {
        if !patch_dirs.iter().any(|(n, _)| *n == number) {
            report.details.missing_patches.push(format!(
                "{}/{}",
                format::bank_dir_name(bank_number),
                format::patch_dir_name(number)
            ));
        }
    }

    if (patch_dirs.len() as i64) < PATCHES_PER_BANK {
        report.warnings.push(format!(
            "Bank {} has only {} patches (expected {})",
            bank_number,
            patch_dirs.len(),
            PATCHES_PER_BANK
        ));
    }

    // A patch directory without a .mmp file is an implicit default patch,
    // not an error.
    for (_, patch_path) in &patch_dirs {
        let _ = files_with_extension(patch_path, PATCH_FILE_EXT)?;
    }

    Ok(())
}

fn validate_sequences(root: &Path, report: &mut ValidationReport) -> io::Result<()> {
    let sequences_path = root.join(SEQUENCES_DIR);
    if !sequences_path.is_dir() {
        report
            .warnings
            .push(format!("Missing {} directory", SEQUENCES_DIR));
        return Ok(());
    }

    let seq_banks = slot_dirs(&sequences_path, BANK_DIR_PREFIX)?;
    let missing_seq_banks = BANKS_PER_KIND - seq_banks.len() as i64;
    if missing_seq_banks > 0 {
        report.warnings.push(format!(
            "{} of {} sequence bank directories are missing",
            missing_seq_banks, BANKS_PER_KIND
        ));
    }

    for (bank_number, bank_path) in &seq_banks {
        let seq_dirs = slot_dirs(bank_path, SEQ_DIR_PREFIX)?;
        report.details.sequence_count += seq_dirs.len() as u32;

        for number in 1..=SEQUENCES_PER_BANK {
            if !seq_dirs.iter().any(|(n, _)| *n == number) {
                report.details.missing_sequences.push(format!(
                    "{}/{}",
                    format::bank_dir_name(*bank_number),
                    format::seq_dir_name(number)
                ));
            }
        }
        if (seq_dirs.len() as i64) < SEQUENCES_PER_BANK {
            report.warnings.push(format!(
                "Sequence bank {} has only {} sequences (expected {})",
                bank_number,
                seq_dirs.len(),
                SEQUENCES_PER_BANK
            ));
        }

        for (seq_number, seq_path) in &seq_dirs {
            let mmseq_files = files_with_extension(seq_path, SEQUENCE_FILE_EXT)?;
            if mmseq_files.is_empty() {
                report.errors.push(format!(
                    "Sequence {} in bank {} is missing its .mmseq file",
                    seq_number, bank_number
                ));
            }
        }
    }

    Ok(())
}

/// Subdirectories of `parent` matching `<prefix>NN`, ascending by slot number
fn slot_dirs(parent: &Path, prefix: &str) -> io::Result<Vec<(i64, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(number) = format::parse_slot_dir(&name.to_string_lossy(), prefix) {
            dirs.push((number, entry.path()));
        }
    }
    dirs.sort_by_key(|(number, _)| *number);
    Ok(dirs)
}

/// File names in `dir` with the given extension, sorted
fn files_with_extension(dir: &Path, ext: &str) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}
