//! Database models
//!
//! Plain records with integer primary keys and explicit foreign keys. The
//! patch tag list is JSON-encoded TEXT in the database; encoding and decoding
//! happen explicitly at the repository boundary via [`encode_tags`] and
//! [`decode_tags`], never through hidden lifecycle hooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An imported patch library. Identity is the whole-subtree fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// Bank flavor: 16 of each per library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankKind {
    Patch,
    Sequence,
}

impl BankKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BankKind::Patch => "patch",
            BankKind::Sequence => "sequence",
        }
    }
}

impl std::str::FromStr for BankKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patch" => Ok(BankKind::Patch),
            "sequence" => Ok(BankKind::Sequence),
            other => Err(crate::Error::Internal(format!("Unknown bank kind: {other}"))),
        }
    }
}

impl std::fmt::Display for BankKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of 32 numbered slots in a library (16 patch banks, 16 sequence banks).
///
/// `content` holds the raw `.bank` file bytes for patch banks and is NULL for
/// sequence banks, which carry no `.bank` file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub id: i64,
    pub library_id: i64,
    pub bank_number: i64,
    pub kind: BankKind,
    pub name: String,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<u8>>,
}

/// One of 16 slots inside a patch bank.
///
/// A default patch stands in for a slot that had no `.mmp` file at import
/// time: no content, a synthesized fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub id: i64,
    pub bank_id: i64,
    pub patch_number: i64,
    pub name: String,
    pub fingerprint: String,
    pub content: Option<String>,
    pub default_patch: bool,
    pub favorited: bool,
    pub tags: Vec<String>,
}

/// Sequence content, stored once per distinct fingerprint and shared between
/// banks via the `bank_sequences` association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSequence {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub content: String,
}

/// A sequence as seen from a bank: the slot number lives on the association,
/// since a shared sequence can occupy different slots in different banks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSlot {
    pub sequence_number: i64,
    pub sequence: PatchSequence,
}

/// Encode a tag list to its TEXT column representation
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the TEXT column representation back into a tag list
///
/// Unparseable or legacy-empty values decode to no tags rather than failing
/// the read.
pub fn decode_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(raw) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(raw, error = %e, "Unparseable tags column, treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        let tags = vec!["bass".to_string(), "pluck".to_string()];
        assert_eq!(decode_tags(&encode_tags(&tags)), tags);
    }

    #[test]
    fn empty_and_garbage_tags_decode_to_nothing() {
        assert!(decode_tags("").is_empty());
        assert!(decode_tags("not json").is_empty());
        assert!(decode_tags("[]").is_empty());
    }

    #[test]
    fn bank_kind_round_trips_through_str() {
        assert_eq!("patch".parse::<BankKind>().unwrap(), BankKind::Patch);
        assert_eq!("sequence".parse::<BankKind>().unwrap(), BankKind::Sequence);
        assert_eq!(BankKind::Patch.as_str(), "patch");
        assert!("drums".parse::<BankKind>().is_err());
    }
}
