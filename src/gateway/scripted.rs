//! Scripted gateway that answers from fixed values.
//!
//! Useful for testing and for running the server without provider access.
//! Every call is recorded so callers can assert what reached the gateway.

use super::AiGateway;
use crate::error::{AuditoriumError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A call received by a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Transcribe { bytes: usize, mime_type: String },
    Embed { text: String },
    GenerateAnswer { question: String, contexts: Vec<String> },
}

/// Gateway returning preconfigured results.
///
/// A `None` transcript or answer makes the matching call fail the way an
/// empty provider response does.
pub struct ScriptedGateway {
    transcript: Option<String>,
    answer: Option<String>,
    embeddings: HashMap<String, Vec<f32>>,
    default_embedding: Vec<f32>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    /// Create a gateway that transcribes to `transcript` and answers `answer`.
    pub fn new(transcript: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            answer: Some(answer.into()),
            embeddings: HashMap::new(),
            default_embedding: vec![1.0, 0.0],
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Return `embedding` whenever `text` is embedded.
    pub fn with_embedding(mut self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.embeddings.insert(text.into(), embedding);
        self
    }

    /// Embedding returned for texts without a specific entry.
    pub fn with_default_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.default_embedding = embedding;
        self
    }

    /// Make every transcription come back empty.
    pub fn without_transcript(mut self) -> Self {
        self.transcript = None;
        self
    }

    /// Make every answer come back empty.
    pub fn without_answer(mut self) -> Self {
        self.answer = None;
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: GatewayCall) -> Result<()> {
        self.calls
            .lock()
            .map_err(|e| AuditoriumError::Internal(format!("Failed to acquire call log: {}", e)))?
            .push(call);
        Ok(())
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        self.record(GatewayCall::Transcribe {
            bytes: audio.len(),
            mime_type: mime_type.to_string(),
        })?;

        self.transcript
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AuditoriumError::TranscriptionFailed("Could not convert the audio to text".to_string())
            })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.record(GatewayCall::Embed {
            text: text.to_string(),
        })?;

        let embedding = self
            .embeddings
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_embedding.clone());

        if embedding.is_empty() {
            return Err(AuditoriumError::EmbeddingFailed("Empty embedding response".to_string()));
        }
        Ok(embedding)
    }

    async fn generate_answer(&self, question: &str, contexts: &[String]) -> Result<String> {
        self.record(GatewayCall::GenerateAnswer {
            question: question.to_string(),
            contexts: contexts.to_vec(),
        })?;

        self.answer
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AuditoriumError::AnswerGenerationFailed("Empty response from LLM".to_string()))
    }
}
