//! Service lifecycle gate.
//!
//! `Uninitialized -> Loading -> Ready -> Draining`, forward only. Requests are
//! admitted only in `Ready`, which is reached after every index has been
//! built, so the build happens-before any reader.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::error::{ServingError, ServingResult};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceState {
    /// Nothing loaded yet.
    Uninitialized,
    /// Snapshots are being read and indexes built.
    Loading,
    /// Serving requests.
    Ready,
    /// No longer admitting requests.
    Draining,
}

impl ServiceState {
    /// Whether `self -> to` is a legal transition.
    pub fn can_transition_to(self, to: ServiceState) -> bool {
        matches!(
            (self, to),
            (Self::Uninitialized, Self::Loading)
                | (Self::Loading, Self::Ready)
                | (Self::Ready, Self::Draining)
        )
    }

    pub fn is_serving(self) -> bool {
        self == Self::Ready
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "Uninitialized",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Draining => "Draining",
        };
        f.write_str(name)
    }
}

/// Shared lifecycle state with change notification.
#[derive(Debug)]
pub struct Lifecycle {
    sender: watch::Sender<ServiceState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ServiceState::Uninitialized);
        Self { sender }
    }

    /// Current state.
    pub fn state(&self) -> ServiceState {
        *self.sender.borrow()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.sender.subscribe()
    }

    /// Move to `to`.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::InvalidTransition` for anything but the next
    /// forward step. The state is left unchanged in that case.
    pub fn transition(&self, to: ServiceState) -> ServingResult<()> {
        let mut rejected = None;
        self.sender.send_if_modified(|current| {
            if current.can_transition_to(to) {
                *current = to;
                true
            } else {
                rejected = Some(*current);
                false
            }
        });

        if let Some(from) = rejected {
            return Err(ServingError::InvalidTransition { from, to });
        }
        info!(state = %to, "Lifecycle transition");
        Ok(())
    }

    /// Admission check for requests.
    ///
    /// # Errors
    ///
    /// Returns `ServingError::NotReady` outside `Ready`.
    pub fn ensure_ready(&self) -> ServingResult<()> {
        let state = self.state();
        if state.is_serving() {
            Ok(())
        } else {
            Err(ServingError::NotReady(state))
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), ServiceState::Uninitialized);

        lifecycle.transition(ServiceState::Loading).unwrap();
        lifecycle.transition(ServiceState::Ready).unwrap();
        assert!(lifecycle.ensure_ready().is_ok());

        lifecycle.transition(ServiceState::Draining).unwrap();
        assert_eq!(lifecycle.state(), ServiceState::Draining);
    }

    #[test]
    fn test_rejects_skipping_loading() {
        let lifecycle = Lifecycle::new();
        let err = lifecycle.transition(ServiceState::Ready).unwrap_err();
        assert!(matches!(
            err,
            ServingError::InvalidTransition {
                from: ServiceState::Uninitialized,
                to: ServiceState::Ready
            }
        ));
        assert_eq!(lifecycle.state(), ServiceState::Uninitialized);
    }

    #[test]
    fn test_rejects_backwards_and_repeat() {
        let lifecycle = Lifecycle::new();
        lifecycle.transition(ServiceState::Loading).unwrap();
        lifecycle.transition(ServiceState::Ready).unwrap();
        lifecycle.transition(ServiceState::Draining).unwrap();

        assert!(lifecycle.transition(ServiceState::Ready).is_err());
        assert!(lifecycle.transition(ServiceState::Draining).is_err());
        assert!(lifecycle.transition(ServiceState::Loading).is_err());
    }

    #[test]
    fn test_not_ready_outside_ready() {
        let lifecycle = Lifecycle::new();
        assert!(matches!(
            lifecycle.ensure_ready(),
            Err(ServingError::NotReady(ServiceState::Uninitialized))
        ));
        lifecycle.transition(ServiceState::Loading).unwrap();
        assert!(matches!(
            lifecycle.ensure_ready(),
            Err(ServingError::NotReady(ServiceState::Loading))
        ));
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let lifecycle = Lifecycle::new();
        let mut rx = lifecycle.subscribe();

        lifecycle.transition(ServiceState::Loading).unwrap();
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), ServiceState::Loading);

        lifecycle.transition(ServiceState::Ready).unwrap();
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), ServiceState::Ready);
    }
}
