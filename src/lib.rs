//! Auditorium - Live audio rooms with AI answers
//!
//! A backend for live sessions: clients create rooms, stream audio chunks
//! into them, and ask questions that are answered from the transcripts.
//!
//! # Overview
//!
//! Auditorium allows you to:
//! - Create rooms and list them with their question counts
//! - Upload audio that is transcribed, embedded and stored per room
//! - Ask questions answered from the closest transcripts of that room
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `store` - Persistence of rooms, questions and audio chunks
//! - `gateway` - Transcription, embedding and answer generation
//! - `rag` - Context retrieval for questions
//! - `service` - Room, question and audio ingestion workflows
//! - `api` - HTTP surface
//!
//! # Example
//!
//! ```rust,no_run
//! use auditorium::service::RoomService;
//! use auditorium::store::{NewRoom, SqliteStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SqliteStore::in_memory()?);
//!     let rooms = RoomService::new(store);
//!
//!     let room_id = rooms.create_room(&NewRoom::new("Sala A", None)).await?;
//!     println!("Created room {}", room_id);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod openai;
pub mod rag;
pub mod service;
pub mod store;

pub use error::{AuditoriumError, Result};
