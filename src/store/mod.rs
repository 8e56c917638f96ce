//! Persistence for rooms, questions and transcribed audio chunks.
//!
//! Each entity has its own store trait so services depend only on what they
//! touch. `SqliteStore` implements all of them over one database; `MemoryStore`
//! does the same in-process.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named session that questions and audio belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a room.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewRoom {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

/// A room as listed, with the number of questions asked in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "questionsCount")]
    pub question_count: u32,
}

/// A question asked in a room, with the generated answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    #[serde(skip)]
    pub room_id: Uuid,
    pub question: String,
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub room_id: Uuid,
    pub question: String,
    pub answer: Option<String>,
}

/// One transcribed and embedded audio upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub id: Uuid,
    pub room_id: Uuid,
    pub transcription: String,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// Input for persisting an audio chunk.
#[derive(Debug, Clone)]
pub struct NewAudioChunk {
    pub room_id: Uuid,
    pub transcription: String,
    pub embedding: Vec<f32>,
}

/// An audio chunk with its cosine distance to a query vector.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: AudioChunk,
    /// Cosine distance (lower is closer).
    pub distance: f32,
}

/// Room persistence.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Insert a room. `None` means the store reported no inserted row.
    async fn create_room(&self, room: &NewRoom) -> Result<Option<Room>>;

    /// List every room with its question count, oldest first.
    async fn list_rooms(&self) -> Result<Vec<RoomSummary>>;
}

/// Question persistence.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Insert a question. `None` means the store reported no inserted row.
    async fn create_question(&self, question: &NewQuestion) -> Result<Option<Question>>;

    /// List the questions of a room, newest first.
    async fn list_questions(&self, room_id: Uuid) -> Result<Vec<Question>>;
}

/// Audio chunk persistence and similarity search.
#[async_trait]
pub trait AudioChunkStore: Send + Sync {
    /// Insert a chunk. `None` means the store reported no inserted row.
    async fn create_chunk(&self, chunk: &NewAudioChunk) -> Result<Option<AudioChunk>>;

    /// The `limit` chunks of a room closest to `embedding`, nearest first.
    async fn nearest_chunks(
        &self,
        room_id: Uuid,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>>;
}

/// Current time at the precision the stores persist.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Cosine distance, `1 - similarity`. Ranges over `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Score chunks against a query and keep the `limit` nearest.
///
/// The sort is stable, so equally distant chunks keep their input order.
pub(crate) fn rank_by_distance(
    chunks: impl IntoIterator<Item = AudioChunk>,
    query: &[f32],
    limit: usize,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|chunk| {
            let distance = cosine_distance(query, &chunk.embedding);
            ScoredChunk { chunk, distance }
        })
        .collect();

    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, embedding: Vec<f32>) -> AudioChunk {
        AudioChunk {
            id: Uuid::new_v4(),
            room_id: Uuid::nil(),
            transcription: text.to_string(),
            embedding,
            created_at: now(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_distance(&a, &d) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_mismatched_dimensions_are_far() {
        assert!((cosine_distance(&[1.0, 0.0], &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!((cosine_distance(&[], &[]) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_rank_by_distance() {
        let chunks = vec![
            chunk("vertical", vec![0.0, 1.0]),
            chunk("horizontal", vec![1.0, 0.0]),
            chunk("diagonal", vec![1.0, 1.0]),
        ];

        let ranked = rank_by_distance(chunks, &[0.9, 0.1], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].chunk.transcription, "horizontal");
        assert_eq!(ranked[1].chunk.transcription, "diagonal");
        assert!(ranked[0].distance < ranked[1].distance);
    }

    #[test]
    fn test_overflowing_embedding_ranks_as_orthogonal() {
        let huge = vec![f32::MAX, f32::MAX];
        assert!((cosine_distance(&huge, &huge) - 1.0).abs() < 0.001);

        let chunks = vec![
            chunk("overflow", huge),
            chunk("near", vec![1.0, 0.0]),
            chunk("opposite", vec![-1.0, 0.0]),
        ];

        let ranked = rank_by_distance(chunks, &[1.0, 0.0], 3);
        let texts: Vec<_> = ranked.iter().map(|s| s.chunk.transcription.as_str()).collect();
        assert_eq!(texts, vec!["near", "overflow", "opposite"]);
        assert!(ranked.iter().all(|s| s.distance.is_finite()));
    }

    #[test]
    fn test_room_summary_json_shape() {
        let summary = RoomSummary {
            id: Uuid::nil(),
            name: "Sala A".to_string(),
            created_at: now(),
            question_count: 2,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["name"], "Sala A");
        assert_eq!(json["questionsCount"], 2);
        assert!(json["createdAt"].is_string());
    }
}
