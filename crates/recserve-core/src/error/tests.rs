use std::path::PathBuf;

use super::*;
use crate::lifecycle::ServiceState;

#[test]
fn test_load_error_display_names_column() {
    let err = LoadError::MissingColumn {
        snapshot: "similarity".to_string(),
        column: "score".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("similarity"), "got: {}", msg);
    assert!(msg.contains("'score'"), "got: {}", msg);
}

#[test]
fn test_load_error_converts_and_is_fatal() {
    let err: ServingError = LoadError::Io {
        path: PathBuf::from("/missing.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
    }
    .into();
    assert!(err.is_fatal());
    assert!(!err.is_client_error());
    assert!(err.to_string().contains("/missing.json"));
}

#[test]
fn test_invalid_request_is_client_error() {
    let err = ServingError::InvalidRequest("k must be positive, got 0".to_string());
    assert!(err.is_client_error());
    assert!(!err.is_fatal());
}

#[test]
fn test_upstream_error_is_recoverable() {
    let err = ServingError::upstream("event_history", "timed out after 100ms");
    assert!(!err.is_fatal());
    assert!(!err.is_client_error());
    assert_eq!(
        err.to_string(),
        "Upstream event_history unavailable: timed out after 100ms"
    );
}

#[test]
fn test_not_ready_display_includes_state() {
    let err = ServingError::NotReady(ServiceState::Draining);
    assert_eq!(err.to_string(), "Service not ready (state: Draining)");
}
