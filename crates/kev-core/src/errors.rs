//! Cross-cutting error types for KevOps.
//!
//! Domain-specific errors (e.g., `DevOpsError`, `ConfigError`) are defined in
//! their respective crates and converge in `kev-cli` through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any KevOps crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A work item identifier was zero, negative, or not a number.
    #[error("invalid work item id: {0}")]
    InvalidId(String),

    /// Data failed validation (format, constraints).
    #[error("validation error: {0}")]
    Validation(String),
}
