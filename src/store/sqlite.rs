//! SQLite-backed store.
//!
//! Similarity search loads a room's chunks and computes cosine distance in
//! Rust. Rooms are small enough that a vector index is not needed.

use super::{
    now, rank_by_distance, AudioChunk, AudioChunkStore, NewAudioChunk, NewQuestion, NewRoom,
    Question, QuestionStore, Room, RoomStore, RoomSummary, ScoredChunk,
};
use crate::error::{AuditoriumError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(name) > 0),
        description TEXT,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS questions (
        id TEXT PRIMARY KEY,
        room_id TEXT NOT NULL REFERENCES rooms(id),
        question TEXT NOT NULL,
        answer TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_questions_room_id ON questions(room_id);

    CREATE TABLE IF NOT EXISTS audio_chunks (
        id TEXT PRIMARY KEY,
        room_id TEXT NOT NULL REFERENCES rooms(id),
        transcription TEXT NOT NULL,
        embedding BLOB NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_audio_chunks_room_id ON audio_chunks(room_id);
"#;

/// SQLite-backed store for rooms, questions and audio chunks.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(conn)?;

        info!("Initialized SQLite store at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AuditoriumError::Store(format!("Failed to acquire lock: {}", e)))
    }

    /// Delete every row from every table.
    pub fn reset(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            DELETE FROM audio_chunks;
            DELETE FROM questions;
            DELETE FROM rooms;
            "#,
        )?;
        info!("Cleared all rooms, questions and audio chunks");
        Ok(())
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn timestamp(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn get_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
        let raw: String = row.get(idx)?;
        Uuid::parse_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    fn get_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(idx)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
        Ok(Room {
            id: Self::get_uuid(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: Self::get_timestamp(row, 3)?,
        })
    }

    fn row_to_question(row: &Row<'_>) -> rusqlite::Result<Question> {
        Ok(Question {
            id: Self::get_uuid(row, 0)?,
            room_id: Self::get_uuid(row, 1)?,
            question: row.get(2)?,
            answer: row.get(3)?,
            created_at: Self::get_timestamp(row, 4)?,
        })
    }

    fn row_to_chunk(row: &Row<'_>) -> rusqlite::Result<AudioChunk> {
        let embedding_bytes: Vec<u8> = row.get(3)?;
        Ok(AudioChunk {
            id: Self::get_uuid(row, 0)?,
            room_id: Self::get_uuid(row, 1)?,
            transcription: row.get(2)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            created_at: Self::get_timestamp(row, 4)?,
        })
    }
}

/// Turn "no row came back" into `None`.
fn optional<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl RoomStore for SqliteStore {
    #[instrument(skip(self, room), fields(name = %room.name))]
    async fn create_room(&self, room: &NewRoom) -> Result<Option<Room>> {
        let conn = self.lock()?;

        let created = conn.query_row(
            r#"
            INSERT INTO rooms (id, name, description, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, description, created_at
            "#,
            params![
                Uuid::new_v4().to_string(),
                room.name,
                room.description,
                Self::timestamp(&now()),
            ],
            Self::row_to_room,
        );

        let created = optional(created)?;
        if let Some(room) = &created {
            debug!("Inserted room {}", room.id);
        }
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.name, r.created_at, COUNT(q.id) AS question_count
            FROM rooms r
            LEFT JOIN questions q ON q.room_id = r.id
            GROUP BY r.id
            ORDER BY r.created_at ASC, r.rowid ASC
            "#,
        )?;

        let rooms = stmt
            .query_map([], |row| {
                Ok(RoomSummary {
                    id: Self::get_uuid(row, 0)?,
                    name: row.get(1)?,
                    created_at: Self::get_timestamp(row, 2)?,
                    question_count: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Listed {} rooms", rooms.len());
        Ok(rooms)
    }
}

#[async_trait]
impl QuestionStore for SqliteStore {
    #[instrument(skip(self, question), fields(room_id = %question.room_id))]
    async fn create_question(&self, question: &NewQuestion) -> Result<Option<Question>> {
        let conn = self.lock()?;

        let created = conn.query_row(
            r#"
            INSERT INTO questions (id, room_id, question, answer, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, room_id, question, answer, created_at
            "#,
            params![
                Uuid::new_v4().to_string(),
                question.room_id.to_string(),
                question.question,
                question.answer,
                Self::timestamp(&now()),
            ],
            Self::row_to_question,
        );

        optional(created)
    }

    #[instrument(skip(self))]
    async fn list_questions(&self, room_id: Uuid) -> Result<Vec<Question>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, room_id, question, answer, created_at
            FROM questions
            WHERE room_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let questions = stmt
            .query_map(params![room_id.to_string()], Self::row_to_question)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Found {} questions for room {}", questions.len(), room_id);
        Ok(questions)
    }
}

#[async_trait]
impl AudioChunkStore for SqliteStore {
    #[instrument(skip(self, chunk), fields(room_id = %chunk.room_id))]
    async fn create_chunk(&self, chunk: &NewAudioChunk) -> Result<Option<AudioChunk>> {
        let conn = self.lock()?;

        let created = conn.query_row(
            r#"
            INSERT INTO audio_chunks (id, room_id, transcription, embedding, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, room_id, transcription, embedding, created_at
            "#,
            params![
                Uuid::new_v4().to_string(),
                chunk.room_id.to_string(),
                chunk.transcription,
                Self::embedding_to_bytes(&chunk.embedding),
                Self::timestamp(&now()),
            ],
            Self::row_to_chunk,
        );

        optional(created)
    }

    #[instrument(skip(self, embedding))]
    async fn nearest_chunks(
        &self,
        room_id: Uuid,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, room_id, transcription, embedding, created_at
            FROM audio_chunks
            WHERE room_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )?;

        let chunks = stmt
            .query_map(params![room_id.to_string()], Self::row_to_chunk)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let ranked = rank_by_distance(chunks, embedding, limit);
        debug!("Found {} nearest chunks in room {}", ranked.len(), room_id);
        Ok(ranked)
    }
}
