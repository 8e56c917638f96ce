//! Application services behind the HTTP surface.
//!
//! Each service takes its stores and the AI gateway as constructor arguments,
//! so tests substitute in-memory stores and scripted gateways.

mod ingestion;
mod questions;
mod rooms;

pub use ingestion::{AudioIngestionService, AudioUpload};
pub use questions::{CreatedQuestion, QuestionService};
pub use rooms::RoomService;
