use axum::{
    routing::{get, post},
    Router,
};
use netrelay_agent::client::ResponseClient;
use netrelay_channels::{dispatch::Dispatcher, mirror::Mirror};
use netrelay_core::config::RelayConfig;
use std::sync::Arc;

use crate::ws::registry::ConnectionRegistry;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: RelayConfig,
    pub ai: ResponseClient,
    pub dispatcher: Dispatcher,
    pub mirror: Arc<Mirror>,
    pub registry: ConnectionRegistry,
}

impl AppState {
    pub fn new(config: RelayConfig, ai: ResponseClient) -> Self {
        Self {
            config,
            ai,
            dispatcher: Dispatcher::new(),
            mirror: Arc::new(Mirror::new()),
            registry: ConnectionRegistry::new(),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/ws", get(crate::ws::connection::ws_handler))
        .route("/webhooks/webex", post(crate::http::ingress::webex_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
