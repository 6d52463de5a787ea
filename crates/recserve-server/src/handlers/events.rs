//! In-memory event store handlers.

use serde_json::{json, Value};
use tracing::debug;

use recserve_core::types::validate_k;

use super::params::{error_response, parse_params, EventParams, UserParams};
use super::Handlers;
use crate::protocol::{JsonRpcId, JsonRpcResponse};

impl Handlers {
    /// `events/put`: record an interaction.
    pub(super) fn handle_events_put(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        if let Err(e) = self.service.lifecycle().ensure_ready() {
            return error_response(id, &e);
        }
        let params: EventParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        self.events.put(params.user_id, params.item_id);
        JsonRpcResponse::success(id, json!({ "result": "ok" }))
    }

    /// `events/get`: `{"events": [...]}`, newest first.
    pub(super) fn handle_events_get(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        if let Err(e) = self.service.lifecycle().ensure_ready() {
            return error_response(id, &e);
        }
        let params: UserParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        let count = match params.k.map(validate_k).transpose() {
            Ok(count) => count.unwrap_or_else(|| self.events.max_per_user()),
            Err(e) => return error_response(id, &e),
        };
        let events = self.events.get(params.user_id, count);
        debug!(user_id = params.user_id, count = events.len(), "Fetched events");
        JsonRpcResponse::success(id, json!({ "events": events }))
    }
}
