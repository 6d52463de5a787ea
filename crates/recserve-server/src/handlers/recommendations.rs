//! Serving operation handlers.

use serde_json::{json, Value};

use super::params::{error_response, parse_params, ItemParams, UserParams};
use super::Handlers;
use crate::protocol::{JsonRpcId, JsonRpcResponse};

impl Handlers {
    /// `similar_items`: `{"item_id_2": [...], "score": [...]}`.
    pub(super) fn handle_similar_items(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: ItemParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        let k = params
            .k
            .unwrap_or(self.service.config().service.default_k_similar);

        match self.service.similar_items(params.item_id, k) {
            Ok(neighbors) => {
                let (ids, scores): (Vec<_>, Vec<_>) =
                    neighbors.iter().map(|n| (n.item_id, n.score)).unzip();
                JsonRpcResponse::success(id, json!({ "item_id_2": ids, "score": scores }))
            }
            Err(e) => error_response(id, &e),
        }
    }

    /// `recommendations_offline`: `{"recs": [...]}`.
    pub(super) fn handle_recommendations_offline(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: UserParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        let k = self.recs_k(&params);
        match self.service.recommendations_offline(params.user_id, k) {
            Ok(recs) => JsonRpcResponse::success(id, json!({ "recs": recs })),
            Err(e) => error_response(id, &e),
        }
    }

    /// `recommendations_online`: `{"recs": [...]}`.
    pub(super) async fn handle_recommendations_online(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: UserParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        let k = self.recs_k(&params);
        match self.service.recommendations_online(params.user_id, k).await {
            Ok(recs) => JsonRpcResponse::success(id, json!({ "recs": recs })),
            Err(e) => error_response(id, &e),
        }
    }

    /// `recommendations`: blended `{"recs": [...]}`.
    pub(super) async fn handle_recommendations(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: UserParams = match parse_params(&id, params) {
            Ok(p) => p,
            Err(resp) => return resp,
        };
        let k = self.recs_k(&params);
        match self.service.recommendations(params.user_id, k).await {
            Ok(recs) => JsonRpcResponse::success(id, json!({ "recs": recs })),
            Err(e) => error_response(id, &e),
        }
    }

    fn recs_k(&self, params: &UserParams) -> i64 {
        params
            .k
            .unwrap_or(self.service.config().service.default_k_recs)
    }
}
