// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `crewdesk serve` command implementation.
//!
//! Wires together the in-memory store, the Azure OpenAI completion gateway,
//! seed data, and the HTTP/WebSocket server.

use std::sync::Arc;

use tracing::info;

use crewdesk_azure::AzureCompletionGateway;
use crewdesk_config::model::CrewdeskConfig;
use crewdesk_core::CrewdeskError;
use crewdesk_gateway::{start_server, AppState, ServerConfig};
use crewdesk_store::MemoryStore;

use crate::seed;

/// Runs the `crewdesk serve` command.
pub async fn run_serve(config: CrewdeskConfig) -> Result<(), CrewdeskError> {
    init_tracing(&config.agent.log_level);

    info!("starting crewdesk serve");

    // Azure credentials are required before anything else starts; a partial
    // configuration should fail here, not on the first chat message.
    if let Err(errors) = crewdesk_config::require_azure(&config) {
        crewdesk_config::render_errors(&errors);
        return Err(CrewdeskError::Config(
            "azure openai configuration is incomplete".to_string(),
        ));
    }

    let completion = Arc::new(AzureCompletionGateway::new(&config.azure)?);

    let store = Arc::new(MemoryStore::new());
    seed::seed_store(store.as_ref()).await?;

    let state = AppState {
        store,
        completion,
        started_at: std::time::Instant::now(),
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state).await
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crewdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
