//! Operation results
//!
//! Every caller-facing operation returns a discriminated result object
//! (`success` plus an optional message) instead of raising to the shell
//! boundary, so a UI can render failures without crashing.

use serde::{Deserialize, Serialize};

/// Row counts committed by a successful import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    pub libraries: u32,
    pub banks: u32,
    pub patches: u32,
    /// Sequence slots linked to banks; shared content counts once per slot
    pub sequences: u32,
}

/// Result of `import_library`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_id: Option<i64>,
    pub imported: ImportCounts,
}

impl ImportOutcome {
    pub fn ok(library_id: i64, imported: ImportCounts) -> Self {
        Self {
            success: true,
            message: None,
            library_id: Some(library_id),
            imported,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            library_id: None,
            imported: ImportCounts::default(),
        }
    }
}

/// Result of `export_library`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<std::path::PathBuf>,
}

impl ExportOutcome {
    pub fn ok(export_path: std::path::PathBuf) -> Self {
        Self {
            success: true,
            message: None,
            export_path: Some(export_path),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            export_path: None,
        }
    }
}

/// Structural counts and gap lists gathered by the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub bank_count: u32,
    pub patch_count: u32,
    pub sequence_count: u32,
    pub missing_banks: Vec<String>,
    pub missing_patches: Vec<String>,
    pub missing_sequences: Vec<String>,
    pub invalid_names: Vec<String>,
}

/// Result of `validate_library`
///
/// `is_valid` depends only on `errors`; warnings never invalidate a tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}
