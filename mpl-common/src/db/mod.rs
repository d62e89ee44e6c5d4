//! Database access shared across MPL crates

pub mod init;
pub mod models;

pub use init::init_database;
pub use models::{Bank, BankKind, Library, Patch, PatchSequence, SequenceSlot};
