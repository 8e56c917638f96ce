//! Configuration module for Auditorium.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts, TranscriptionPrompts};
pub use settings::{
    AiSettings, DatabaseSettings, PromptSettings, RagSettings, ServerSettings, Settings,
};
