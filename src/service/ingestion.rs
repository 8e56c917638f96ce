//! Audio ingestion: transcribe, embed, persist.

use crate::error::{AuditoriumError, Result};
use crate::gateway::AiGateway;
use crate::store::{AudioChunkStore, NewAudioChunk};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// One uploaded audio blob.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioUpload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Turns uploaded audio into a stored, embedded transcript.
#[derive(Clone)]
pub struct AudioIngestionService {
    chunks: Arc<dyn AudioChunkStore>,
    gateway: Arc<dyn AiGateway>,
}

impl AudioIngestionService {
    pub fn new(chunks: Arc<dyn AudioChunkStore>, gateway: Arc<dyn AiGateway>) -> Self {
        Self { chunks, gateway }
    }

    /// Transcribe and embed `upload`, store it as one chunk of `room_id`.
    ///
    /// A missing or empty upload fails before the gateway is called.
    #[instrument(skip(self, upload))]
    pub async fn ingest_audio(&self, room_id: Uuid, upload: Option<AudioUpload>) -> Result<Uuid> {
        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or(AuditoriumError::AudioRequired)?;

        let transcription = self.gateway.transcribe(&upload.bytes, &upload.mime_type).await?;
        debug!("Transcribed {} bytes of {}", upload.bytes.len(), upload.mime_type);

        let embedding = self.gateway.embed(&transcription).await?;

        let chunk = self
            .chunks
            .create_chunk(&NewAudioChunk {
                room_id,
                transcription,
                embedding,
            })
            .await?
            .ok_or(AuditoriumError::ChunkPersistenceFailed)?;

        info!("Stored audio chunk {} for room {}", chunk.id, room_id);
        Ok(chunk.id)
    }
}
