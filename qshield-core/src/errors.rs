//! errors.rs - Custom error types for the qshield-core library.
//!
//! Most failures in this crate are absorbed close to where they happen and
//! only logged (bad patterns, unreadable configuration, failed batches). The
//! variants below are what those places log, plus the few errors that are
//! returned to the caller.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ShieldError {
    #[error("Failed to compile redaction pattern '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Pattern entry is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("Pattern '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Pattern '{pattern}': replacement references unknown capture group '{group}'")]
    InvalidGroupReference { pattern: String, group: String },

    #[error("Redaction failed: {0}")]
    Redaction(String),

    #[error("Configuration problem: library_client_config_path option is not set")]
    MissingLibraryClientPath,

    #[error("Failed to initialize library client from '{path}': {reason}")]
    LibraryClientInit { path: String, reason: String },

    #[error("Llama Stack request failed: {0}")]
    Http(#[from] reqwest::Error),
}
