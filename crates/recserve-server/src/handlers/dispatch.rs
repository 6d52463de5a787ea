//! Request dispatch.

use tracing::debug;

use super::Handlers;
use crate::protocol::{error_codes, methods, JsonRpcRequest, JsonRpcResponse};

impl Handlers {
    /// Dispatch a request to the appropriate handler.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Dispatching method: {}", request.method);

        match request.method.as_str() {
            // Serving operations
            methods::SIMILAR_ITEMS => self.handle_similar_items(request.id, request.params),
            methods::RECOMMENDATIONS_OFFLINE => {
                self.handle_recommendations_offline(request.id, request.params)
            }
            methods::RECOMMENDATIONS_ONLINE => {
                self.handle_recommendations_online(request.id, request.params)
                    .await
            }
            methods::RECOMMENDATIONS => {
                self.handle_recommendations(request.id, request.params)
                    .await
            }

            // Event store
            methods::EVENTS_PUT => self.handle_events_put(request.id, request.params),
            methods::EVENTS_GET => self.handle_events_get(request.id, request.params),

            // Lifecycle
            methods::HEALTH => self.handle_health(request.id),
            methods::SHUTDOWN => self.handle_shutdown(request.id),

            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }
}
