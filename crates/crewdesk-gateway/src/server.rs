// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crewdesk_core::{CompletionProvider, CrewdeskError, Store};

use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers and WebSocket sessions.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend shared by the REST API and sessions.
    pub store: Arc<dyn Store>,
    /// Completion provider driving reply generation.
    pub completion: Arc<dyn CompletionProvider>,
    /// Process start time for uptime reporting.
    pub started_at: std::time::Instant,
}

/// Server configuration (mirrors ServerConfig from crewdesk-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/api/faqs",
            get(handlers::get_faqs).post(handlers::post_faq),
        )
        .route(
            "/api/faqs/{id}",
            axum::routing::patch(handlers::patch_faq).delete(handlers::delete_faq),
        )
        .route("/api/crm/{customer_id}", get(handlers::get_crm_record))
        .route("/api/popular-searches", get(handlers::get_popular_searches))
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP/WebSocket server.
///
/// Binds to the configured host:port and serves until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), CrewdeskError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CrewdeskError::Channel {
            message: format!("failed to bind server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CrewdeskError::Channel {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crewdesk_core::types::{Faq, FaqMatch, Message};
    use crewdesk_store::MemoryStore;

    struct NoopCompletion;

    #[async_trait]
    impl CompletionProvider for NoopCompletion {
        async fn detect_language(&self, _text: &str) -> String {
            "en".to_string()
        }
        async fn match_faq(&self, _message: &str, _faqs: &[Faq]) -> Option<FaqMatch> {
            None
        }
        async fn generate_reply(
            &self,
            _history: &[Message],
            _context_summary: Option<&str>,
            _language: &str,
        ) -> Result<String, CrewdeskError> {
            Ok(String::new())
        }
        async fn generate_suggestions(&self, _reply: &str) -> Vec<String> {
            Vec::new()
        }
        async fn summarize(&self, _history: &[Message]) -> Option<String> {
            None
        }
    }

    #[test]
    fn app_state_is_clone() {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            completion: Arc::new(NoopCompletion),
            started_at: std::time::Instant::now(),
        };
        let _cloned = state.clone();
    }

    #[test]
    fn router_builds() {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            completion: Arc::new(NoopCompletion),
            started_at: std::time::Instant::now(),
        };
        let _app = router(state);
    }
}
