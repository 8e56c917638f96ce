//! HTTP API.
//!
//! JSON endpoints for rooms, questions and audio uploads.

mod audio;
mod error;
mod questions;
mod rooms;

use crate::error::{AuditoriumError, Result};
use crate::gateway::AiGateway;
use crate::service::{AudioIngestionService, QuestionService, RoomService};
use crate::store::{AudioChunkStore, QuestionStore, RoomStore};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted audio upload.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    pub rooms: RoomService,
    pub questions: QuestionService,
    pub ingestion: AudioIngestionService,
}

impl AppState {
    /// Wire every service to one store and one gateway.
    pub fn new<S>(store: Arc<S>, gateway: Arc<dyn AiGateway>, max_context_chunks: usize) -> Self
    where
        S: RoomStore + QuestionStore + AudioChunkStore + 'static,
    {
        Self {
            rooms: RoomService::new(store.clone()),
            questions: QuestionService::new(
                store.clone(),
                store.clone(),
                gateway.clone(),
                max_context_chunks,
            ),
            ingestion: AudioIngestionService::new(store, gateway),
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/rooms/{room_id}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/rooms/{room_id}/audio",
            post(audio::upload_audio).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer admitting the web front-end.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| AuditoriumError::Config(format!("Invalid CORS origin {:?}: {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Serve the API on an already bound listener until the process is stopped.
pub async fn serve(listener: TcpListener, cors_origin: &str, state: AppState) -> Result<()> {
    let app = router(Arc::new(state)).layer(cors_layer(cors_origin)?);

    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found(uri: Uri) -> AuditoriumError {
    AuditoriumError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::gateway::ScriptedGateway;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_serve_on_bound_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedGateway::new("t", "a")),
            3,
        );
        tokio::spawn(async move {
            serve(listener, "http://localhost:5173", state).await.unwrap();
        });

        let response = reqwest::Client::new()
            .get(format!("http://{}/health", addr))
            .header("Origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(matches!(
            cors_layer("bad\norigin"),
            Err(AuditoriumError::Config(_))
        ));
    }
}
