//! Schema validator integration tests

mod helpers;

use helpers::full_library;
use mpl_le::services::validate;

#[test]
fn well_formed_tree_validates_cleanly() {
    let fixture = full_library("ValidLibrary");

    let report = validate(&fixture.root);

    assert!(report.is_valid, "errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.details.bank_count, 16);
    assert_eq!(report.details.patch_count, 256);
    assert_eq!(report.details.sequence_count, 256);
    assert!(report.details.missing_banks.is_empty());
    assert!(report.details.missing_patches.is_empty());
    assert!(report.details.missing_sequences.is_empty());
    assert!(report.details.invalid_names.is_empty());
}

#[test]
fn missing_bank_file_is_an_error() {
    let fixture = full_library("NoBankFile");
    fixture.remove_bank_file(7);

    let report = validate(&fixture.root);

    assert!(!report.is_valid);
    assert!(report
        .errors
        .iter()
        .any(|e| e == "Bank 7 is missing its .bank file"));
}

#[test]
fn missing_patch_directory_is_only_a_warning() {
    let fixture = full_library("SparsePatches");
    std::fs::remove_dir_all(fixture.patch_dir(4, 9)).unwrap();

    let report = validate(&fixture.root);

    assert!(report.is_valid);
    assert_eq!(report.details.patch_count, 255);
    assert!(report
        .warnings
        .iter()
        .any(|w| w == "Bank 4 has only 15 patches (expected 16)"));
    assert!(report
        .details
        .missing_patches
        .iter()
        .any(|p| p == "bank04/patch09"));
}

#[test]
fn missing_mmp_file_alone_is_tolerated() {
    // The slot directory exists but holds no .mmp: an implicit default patch
    let fixture = full_library("DefaultSlot");
    fixture.remove_patch_file(4, 9);

    let report = validate(&fixture.root);

    assert!(report.is_valid);
    assert_eq!(report.details.patch_count, 256);
    assert!(report.warnings.is_empty());
}

#[test]
fn missing_mmseq_file_is_an_error() {
    let fixture = full_library("NoSeqFile");
    fixture.remove_sequence_file(2, 3);

    let report = validate(&fixture.root);

    assert!(!report.is_valid);
    assert!(report
        .errors
        .iter()
        .any(|e| e == "Sequence 3 in bank 2 is missing its .mmseq file"));
}

#[test]
fn missing_bank_directory_is_recorded_not_raised() {
    let fixture = full_library("MissingBank");
    std::fs::remove_dir_all(fixture.bank_dir(10)).unwrap();

    let report = validate(&fixture.root);

    assert!(report.is_valid);
    assert_eq!(report.details.bank_count, 15);
    assert_eq!(report.details.missing_banks, vec!["bank10".to_string()]);
    assert!(!report.warnings.is_empty());
}

#[test]
fn validator_and_import_agree_on_the_effective_root() {
    // Both resolve <root>/library, so pointing either at the outer directory
    // works identically.
    let fixture = full_library("Agreement");

    let outer = validate(&fixture.root);
    let inner = validate(&fixture.library_dir());

    assert!(outer.is_valid);
    assert!(inner.is_valid);
    assert_eq!(outer.details.bank_count, inner.details.bank_count);
    assert_eq!(outer.details.patch_count, inner.details.patch_count);
    assert_eq!(outer.details.sequence_count, inner.details.sequence_count);
}
