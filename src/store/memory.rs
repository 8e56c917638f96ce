//! In-memory store implementation.
//!
//! Mirrors the SQLite constraints (non-empty room names, questions and chunks
//! must reference an existing room). Useful for testing.

use super::{
    now, rank_by_distance, AudioChunk, AudioChunkStore, NewAudioChunk, NewQuestion, NewRoom,
    Question, QuestionStore, Room, RoomStore, RoomSummary, ScoredChunk,
};
use crate::error::{AuditoriumError, Result};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    rooms: Vec<Room>,
    questions: Vec<Question>,
    chunks: Vec<AudioChunk>,
}

impl Tables {
    fn ensure_room(&self, room_id: Uuid) -> Result<()> {
        if self.rooms.iter().any(|r| r.id == room_id) {
            Ok(())
        } else {
            Err(AuditoriumError::Store(format!(
                "FOREIGN KEY constraint failed: room {} does not exist",
                room_id
            )))
        }
    }
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| AuditoriumError::Store(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| AuditoriumError::Store(format!("Failed to acquire lock: {}", e)))
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn create_room(&self, room: &NewRoom) -> Result<Option<Room>> {
        if room.name.is_empty() {
            return Err(AuditoriumError::Store(
                "CHECK constraint failed: length(name) > 0".to_string(),
            ));
        }

        let created = Room {
            id: Uuid::new_v4(),
            name: room.name.clone(),
            description: room.description.clone(),
            created_at: now(),
        };
        self.write()?.rooms.push(created.clone());
        Ok(Some(created))
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>> {
        let tables = self.read()?;

        // Rooms are kept in insertion order, which is creation order.
        Ok(tables
            .rooms
            .iter()
            .map(|room| RoomSummary {
                id: room.id,
                name: room.name.clone(),
                created_at: room.created_at,
                question_count: tables
                    .questions
                    .iter()
                    .filter(|q| q.room_id == room.id)
                    .count() as u32,
            })
            .collect())
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn create_question(&self, question: &NewQuestion) -> Result<Option<Question>> {
        let mut tables = self.write()?;
        tables.ensure_room(question.room_id)?;

        let created = Question {
            id: Uuid::new_v4(),
            room_id: question.room_id,
            question: question.question.clone(),
            answer: question.answer.clone(),
            created_at: now(),
        };
        tables.questions.push(created.clone());
        Ok(Some(created))
    }

    async fn list_questions(&self, room_id: Uuid) -> Result<Vec<Question>> {
        let tables = self.read()?;
        Ok(tables
            .questions
            .iter()
            .rev()
            .filter(|q| q.room_id == room_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AudioChunkStore for MemoryStore {
    async fn create_chunk(&self, chunk: &NewAudioChunk) -> Result<Option<AudioChunk>> {
        let mut tables = self.write()?;
        tables.ensure_room(chunk.room_id)?;

        let created = AudioChunk {
            id: Uuid::new_v4(),
            room_id: chunk.room_id,
            transcription: chunk.transcription.clone(),
            embedding: chunk.embedding.clone(),
            created_at: now(),
        };
        tables.chunks.push(created.clone());
        Ok(Some(created))
    }

    async fn nearest_chunks(
        &self,
        room_id: Uuid,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let tables = self.read()?;
        let chunks = tables
            .chunks
            .iter()
            .filter(|c| c.room_id == room_id)
            .cloned();
        Ok(rank_by_distance(chunks, embedding, limit))
    }
}
