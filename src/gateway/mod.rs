//! Boundary to the generative AI provider.
//!
//! Three single-shot operations: transcribe audio, embed text, and answer a
//! question from transcript context. Failures are never retried.

mod openai;
mod scripted;

pub use openai::OpenAIGateway;
pub use scripted::{GatewayCall, ScriptedGateway};

use crate::error::Result;
use async_trait::async_trait;

/// Separator placed between context transcripts.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Trait for the AI operations the services rely on.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Transcribe raw audio of the given mime type into text.
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String>;

    /// Generate a document embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Answer `question` using `contexts` in the given order.
    async fn generate_answer(&self, question: &str, contexts: &[String]) -> Result<String>;
}

/// Join transcripts into one context block, preserving order.
pub fn join_context(contexts: &[String]) -> String {
    contexts.join(CONTEXT_SEPARATOR)
}

/// Pick an upload file name whose extension matches the mime type.
///
/// Transcription endpoints sniff the format from the file name.
pub fn file_name_for_mime(mime_type: &str) -> String {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    let subtype = essence
        .split_once('/')
        .map(|(_, sub)| sub.trim())
        .filter(|sub| !sub.is_empty());

    let extension = match subtype {
        Some("mpeg") | Some("mp3") => "mp3",
        Some("x-wav") | Some("wave") | Some("wav") => "wav",
        Some("x-m4a") | Some("m4a") | Some("mp4") => "m4a",
        Some("ogg") | Some("opus") => "ogg",
        Some(other) if other.chars().all(|c| c.is_ascii_alphanumeric()) => other,
        _ => "webm",
    };

    format!("audio.{}", extension)
}
