//! Request handlers.
//!
//! - `dispatch`: method routing
//! - `recommendations`: the four serving operations
//! - `events`: in-memory event store (`events/put`, `events/get`)
//! - `lifecycle`: `health` and `shutdown`
//! - `params`: parameter decoding and error mapping

mod dispatch;
mod events;
mod lifecycle;
mod params;
mod recommendations;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use recserve_core::stubs::InMemoryEventHistory;
use recserve_core::RecommendationService;

/// Shared handler state.
///
/// The service is read-only after startup; the event store is the only
/// mutable collaborator and synchronizes internally.
#[derive(Debug, Clone)]
pub struct Handlers {
    service: Arc<RecommendationService>,
    events: Arc<InMemoryEventHistory>,
}

impl Handlers {
    pub fn new(service: Arc<RecommendationService>, events: Arc<InMemoryEventHistory>) -> Self {
        Self { service, events }
    }

    pub fn service(&self) -> &Arc<RecommendationService> {
        &self.service
    }
}
