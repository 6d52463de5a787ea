//! Sub-error types for recserve-core.
//!
//! Each error type covers a specific domain of failures.

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// LOAD ERROR
// ============================================================================

/// Snapshot load and index build errors.
///
/// Any of these aborts the `Loading` phase. No partial index is ever
/// published when one is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not a valid columnar JSON document.
    #[error("Malformed snapshot {snapshot}: {reason}")]
    Malformed {
        /// Snapshot name (similarity, personal, default)
        snapshot: String,
        reason: String,
    },

    /// A required column is absent.
    #[error("Snapshot {snapshot} is missing required column '{column}'")]
    MissingColumn { snapshot: String, column: String },

    /// Columns of one snapshot have different lengths.
    #[error("Snapshot {snapshot}: column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        snapshot: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A value is outside the declared domain of its column.
    #[error("Snapshot {snapshot}: invalid value in column '{column}' at row {row}: {reason}")]
    InvalidValue {
        snapshot: String,
        column: String,
        row: usize,
        reason: String,
    },
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::ServingConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field failed validation.
    #[error("Invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
