//! # MPL Common Library
//!
//! Shared code for the MPL patch library manager:
//! - Error types and the crate-wide `Result` alias
//! - Configuration loading and root folder resolution
//! - Content fingerprinting (SHA-256 over bytes and directory subtrees)
//! - Database initialization, schema, and row models

pub mod config;
pub mod db;
pub mod error;
pub mod fingerprint;

pub use error::{Error, Result};
