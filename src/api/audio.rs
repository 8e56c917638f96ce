//! Audio upload endpoint.

use super::AppState;
use crate::error::{AuditoriumError, Result};
use crate::service::AudioUpload;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Mime type assumed when the upload does not declare one.
const DEFAULT_MIME_TYPE: &str = "audio/webm";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadAudioResponse {
    chunk_id: Uuid,
}

pub(super) async fn upload_audio(
    State(state): State<Arc<AppState>>,
    room_id: std::result::Result<Path<Uuid>, PathRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadAudioResponse>)> {
    let Path(room_id) = room_id?;

    // A body that is not multipart carries no file.
    let upload = match multipart {
        Ok(multipart) => read_audio(multipart).await?,
        Err(_) => None,
    };

    let chunk_id = state.ingestion.ingest_audio(room_id, upload).await?;
    Ok((StatusCode::CREATED, Json(UploadAudioResponse { chunk_id })))
}

/// Take the first file field of the form.
async fn read_audio(mut multipart: Multipart) -> Result<Option<AudioUpload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AuditoriumError::Validation(e.body_text()))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let mime_type = field.content_type().unwrap_or(DEFAULT_MIME_TYPE).to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AuditoriumError::Validation(e.body_text()))?;

        debug!("Received {} bytes of {}", bytes.len(), mime_type);
        return Ok(Some(AudioUpload::new(bytes.to_vec(), mime_type)));
    }

    Ok(None)
}
