//! Error types for Auditorium.

use thiserror::Error;

/// Library-level error type for Auditorium operations.
#[derive(Error, Debug)]
pub enum AuditoriumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Audio is required.")]
    AudioRequired,

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Answer generation failed: {0}")]
    AnswerGenerationFailed(String),

    #[error("Failed to create new room")]
    RoomCreationFailed,

    #[error("Failed to create new question")]
    QuestionCreationFailed,

    #[error("Failed to persist audio chunk")]
    ChunkPersistenceFailed,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Coarse failure classes surfaced to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// The AI provider returned nothing usable.
    UpstreamAi,
    /// A store write produced no row or violated a constraint.
    Persistence,
    /// The requested resource or route does not exist.
    NotFound,
    /// Anything else (configuration, IO, transport).
    Internal,
}

impl ErrorKind {
    /// Stable slug used in JSON error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::UpstreamAi => "upstream_ai",
            ErrorKind::Persistence => "persistence",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl AuditoriumError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuditoriumError::Validation(_) | AuditoriumError::AudioRequired => ErrorKind::Validation,
            AuditoriumError::TranscriptionFailed(_)
            | AuditoriumError::EmbeddingFailed(_)
            | AuditoriumError::AnswerGenerationFailed(_) => ErrorKind::UpstreamAi,
            AuditoriumError::RoomCreationFailed
            | AuditoriumError::QuestionCreationFailed
            | AuditoriumError::ChunkPersistenceFailed
            | AuditoriumError::Store(_)
            | AuditoriumError::Database(_) => ErrorKind::Persistence,
            AuditoriumError::NotFound(_) => ErrorKind::NotFound,
            AuditoriumError::Config(_)
            | AuditoriumError::Internal(_)
            | AuditoriumError::Io(_)
            | AuditoriumError::TomlParse(_)
            | AuditoriumError::Http(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for Auditorium operations.
pub type Result<T> = std::result::Result<T, AuditoriumError>;
