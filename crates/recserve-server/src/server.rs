//! Stdio JSON-RPC server.
//!
//! Startup loads every snapshot before the first request is read; a load
//! failure aborts startup. Requests are served one per line until EOF or
//! `shutdown`, after which the service drains.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use recserve_core::stubs::InMemoryEventHistory;
use recserve_core::{RecommendationService, ServiceState, ServingConfig};

use crate::handlers::Handlers;
use crate::protocol::{error_codes, JsonRpcRequest, JsonRpcResponse};

/// Server state.
pub struct RecServer {
    handlers: Handlers,
}

impl RecServer {
    /// Load snapshots and build a ready server.
    ///
    /// # Errors
    ///
    /// Returns error if any snapshot fails to load. The process must not
    /// serve in that case.
    pub async fn new(config: ServingConfig) -> Result<Self> {
        info!("Initializing recommendation server...");

        let events = Arc::new(InMemoryEventHistory::new(config.events.max_per_user));
        let history = Arc::clone(&events);

        // Index building is synchronous and CPU bound.
        let service = tokio::task::spawn_blocking(move || {
            RecommendationService::load(config, history)
        })
        .await
        .context("Snapshot loading task panicked")?
        .map_err(|e| {
            error!("FATAL: Failed to load snapshots: {}", e);
            anyhow::anyhow!("Failed to load snapshots: {}", e)
        })?;

        Ok(Self::with_service(Arc::new(service), events))
    }

    /// Wrap an already loaded service.
    pub fn with_service(
        service: Arc<RecommendationService>,
        events: Arc<InMemoryEventHistory>,
    ) -> Self {
        Self {
            handlers: Handlers::new(service, events),
        }
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Run the server, reading from stdin and writing to stdout.
    pub async fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock()).await
    }

    /// Serve newline-delimited requests from `input`, writing responses to
    /// `output`.
    pub async fn run_with<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<()> {
        info!("Server ready, waiting for requests...");

        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Error reading input: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let response = self.handle_request(&line).await;

            let response_json = serde_json::to_string(&response)?;
            debug!("Sending: {}", response_json);

            writeln!(output, "{}", response_json)?;
            output.flush()?;
        }

        let service = self.handlers.service();
        if service.state() == ServiceState::Ready {
            if let Err(e) = service.begin_drain() {
                warn!("Failed to drain on EOF: {}", e);
            }
        }
        info!("Server shutting down...");
        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, input: &str) -> JsonRpcResponse {
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                );
            }
        };

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            );
        }

        self.handlers.dispatch(request).await
    }
}
