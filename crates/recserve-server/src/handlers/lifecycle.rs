//! Lifecycle handlers.

use serde_json::json;
use tracing::info;

use super::params::error_response;
use super::Handlers;
use crate::protocol::{JsonRpcId, JsonRpcResponse};

impl Handlers {
    /// `health`: current lifecycle state and index sizes.
    pub(super) fn handle_health(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        let service = &self.service;
        JsonRpcResponse::success(
            id,
            json!({
                "state": service.state(),
                "similarity_items": service.similarity_index().item_count(),
                "personal_users": service.recommendation_index().user_count(),
                "default_ranking_len": service.recommendation_index().default_ranking().len(),
            }),
        )
    }

    /// `shutdown`: stop admitting requests.
    pub(super) fn handle_shutdown(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Shutdown requested");
        match self.service.begin_drain() {
            Ok(()) => JsonRpcResponse::success(id, json!({ "state": self.service.state() })),
            Err(e) => error_response(id, &e),
        }
    }
}
