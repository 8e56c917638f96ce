//! Context building for question answering.

use super::ContextChunk;
use crate::error::Result;
use crate::gateway::AiGateway;
use crate::store::AudioChunkStore;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Number of nearest transcripts handed to the answer model.
pub const DEFAULT_MAX_CONTEXT_CHUNKS: usize = 3;

/// Builds context for a question from the transcripts of its room.
pub struct ContextBuilder {
    chunks: Arc<dyn AudioChunkStore>,
    gateway: Arc<dyn AiGateway>,
    max_chunks: usize,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(chunks: Arc<dyn AudioChunkStore>, gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            chunks,
            gateway,
            max_chunks: DEFAULT_MAX_CONTEXT_CHUNKS,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Embed `question` and return the nearest chunks of `room_id`, nearest first.
    #[instrument(skip(self, question))]
    pub async fn build(&self, room_id: Uuid, question: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.gateway.embed(question).await?;

        let nearest = self
            .chunks
            .nearest_chunks(room_id, &query_embedding, self.max_chunks)
            .await?;

        let context: Vec<ContextChunk> = nearest.into_iter().map(ContextChunk::from).collect();
        for chunk in &context {
            debug!(chunk_id = %chunk.chunk_id, distance = chunk.distance, "Selected context chunk");
        }
        debug!("Retrieved {} context chunks", context.len());
        Ok(context)
    }
}

/// The transcripts of `chunks`, in order.
pub fn transcripts(chunks: &[ContextChunk]) -> Vec<String> {
    chunks.iter().map(|c| c.transcription.clone()).collect()
}
