//! Retrieval of transcript context for question answering.

pub mod context;

pub use context::{ContextBuilder, DEFAULT_MAX_CONTEXT_CHUNKS};

use crate::store::ScoredChunk;
use uuid::Uuid;

/// A retrieved transcript with its distance to the question.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Audio chunk ID.
    pub chunk_id: Uuid,
    /// Transcribed text.
    pub transcription: String,
    /// Cosine distance to the question (lower is closer).
    pub distance: f32,
}

impl From<ScoredChunk> for ContextChunk {
    fn from(scored: ScoredChunk) -> Self {
        Self {
            chunk_id: scored.chunk.id,
            transcription: scored.chunk.transcription,
            distance: scored.distance,
        }
    }
}
