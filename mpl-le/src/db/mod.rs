//! Repository functions over the MPL schema
//!
//! Plain async functions taking a `&SqlitePool` and returning plain records.
//! This is the entire persistence surface the pipelines are allowed to touch.

pub mod banks;
pub mod libraries;
pub mod patches;
pub mod sequences;

use mpl_common::Error;

/// Translate a UNIQUE-constraint violation into a Duplicate error carrying a
/// caller-facing message; every other database error passes through.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return Error::Duplicate(message.to_string());
        }
    }
    Error::Database(err)
}
