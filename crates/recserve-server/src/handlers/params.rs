//! Parameter decoding and error mapping.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use recserve_core::{ItemId, ServingError, UserId};

use crate::protocol::{error_codes, JsonRpcId, JsonRpcResponse};

/// `similar_items` parameters.
#[derive(Debug, Deserialize)]
pub(super) struct ItemParams {
    pub item_id: ItemId,
    #[serde(default)]
    pub k: Option<i64>,
}

/// Parameters of the per-user operations.
#[derive(Debug, Deserialize)]
pub(super) struct UserParams {
    pub user_id: UserId,
    #[serde(default)]
    pub k: Option<i64>,
}

/// `events/put` parameters.
#[derive(Debug, Deserialize)]
pub(super) struct EventParams {
    pub user_id: UserId,
    pub item_id: ItemId,
}

/// Decode `params` into `T`, or build an `INVALID_PARAMS` response.
pub(super) fn parse_params<T: DeserializeOwned>(
    id: &Option<JsonRpcId>,
    params: Option<Value>,
) -> Result<T, JsonRpcResponse> {
    let params = params.ok_or_else(|| {
        JsonRpcResponse::error(id.clone(), error_codes::INVALID_PARAMS, "Missing params")
    })?;
    serde_json::from_value(params).map_err(|e| {
        debug!(error = %e, "Rejected malformed params");
        JsonRpcResponse::error(
            id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid params: {}", e),
        )
    })
}

/// Map a serving error to a JSON-RPC error response.
pub(super) fn error_response(id: Option<JsonRpcId>, err: &ServingError) -> JsonRpcResponse {
    let code = match err {
        ServingError::InvalidRequest(_) => error_codes::INVALID_PARAMS,
        ServingError::NotReady(_) => error_codes::NOT_READY,
        ServingError::UpstreamUnavailable { .. }
        | ServingError::InvalidTransition { .. }
        | ServingError::Load(_)
        | ServingError::Config(_) => error_codes::INTERNAL_ERROR,
    };
    if code == error_codes::INTERNAL_ERROR {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Request rejected");
    }
    JsonRpcResponse::error(id, code, err.to_string())
}
