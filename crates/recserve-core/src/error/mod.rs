//! Error types for recserve-core.
//!
//! - [`ServingError`]: Top-level error for every request and lifecycle path
//! - [`LoadError`]: Snapshot load and index build failures (fatal at startup)
//! - [`ConfigError`]: Configuration parse and validation failures
//!
//! Only load failures are fatal to the process. Upstream failures during a
//! request degrade to empty contributions and are never returned to callers
//! of the blended operations.
//!
//! # Examples
//!
//! ```rust
//! use recserve_core::error::ServingError;
//! use recserve_core::types::validate_k;
//!
//! let result = validate_k(0);
//! assert!(matches!(result, Err(ServingError::InvalidRequest(_))));
//! ```

mod sub_errors;
mod unified;

#[cfg(test)]
mod tests;

pub use sub_errors::{ConfigError, LoadError};
pub use unified::{ServingError, ServingResult};
