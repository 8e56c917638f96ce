//! Serve command implementation.

use crate::api::{self, AppState};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::gateway::OpenAIGateway;
use crate::openai::is_api_key_configured;
use crate::store::SqliteStore;
use anyhow::{bail, Context, Result};
use std::sync::Arc;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, mut settings: Settings) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    if !is_api_key_configured(&settings.ai) {
        bail!("No API key configured. Set ai.api_key in the config file or export OPENAI_API_KEY.");
    }

    let store = Arc::new(SqliteStore::new(&settings.database_path())?);
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let gateway = Arc::new(OpenAIGateway::new(&settings.ai, prompts)?);

    let state = AppState::new(store, gateway, settings.rag.max_context_chunks);
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    Output::header("Auditorium API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Database", &settings.database_path().display().to_string());
    Output::kv("CORS origin", &settings.server.cors_origin);
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("List Rooms", "GET  /rooms");
    Output::kv("Create Room", "POST /rooms");
    Output::kv("List Questions", "GET  /rooms/{roomId}/questions");
    Output::kv("Ask Question", "POST /rooms/{roomId}/questions");
    Output::kv("Upload Audio", "POST /rooms/{roomId}/audio");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    api::serve(listener, &settings.server.cors_origin, state).await?;

    Ok(())
}
