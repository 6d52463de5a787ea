//! Top-level serving error.

use thiserror::Error;

use super::sub_errors::{ConfigError, LoadError};
use crate::lifecycle::ServiceState;

/// Unified error type for recserve.
#[derive(Debug, Error)]
pub enum ServingError {
    /// Client supplied a non-positive `k` or a malformed identifier.
    ///
    /// Rejected before any index access.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An upstream collaborator failed or timed out.
    ///
    /// # Recovery
    ///
    /// Recoverable. Fan-out callers log it and substitute an empty
    /// contribution.
    #[error("Upstream {upstream} unavailable: {reason}")]
    UpstreamUnavailable {
        /// Collaborator name (event_history, similarity)
        upstream: &'static str,
        reason: String,
    },

    /// Request arrived while the service was not `Ready`.
    #[error("Service not ready (state: {0})")]
    NotReady(ServiceState),

    /// Illegal lifecycle transition.
    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: ServiceState, to: ServiceState },

    /// Startup load failure. Fatal.
    #[error("Startup load failed: {0}")]
    Load(#[from] LoadError),

    /// Configuration failure. Fatal.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ServingError {
    /// Build an `UpstreamUnavailable` error.
    pub fn upstream(upstream: &'static str, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            upstream,
            reason: reason.into(),
        }
    }

    /// Whether the error is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Whether the error must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Config(_))
    }
}

/// Result alias for recserve operations.
pub type ServingResult<T> = std::result::Result<T, ServingError>;
