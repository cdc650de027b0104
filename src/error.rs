//! Error handling for the resume ATS scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding model unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    #[error("Leaderboard storage error: {0}")]
    StorageIo(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Report generation error: {0}")]
    Report(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResumeAtsError>;

/// The embedding library reports failures through anyhow; keep the whole chain
impl From<anyhow::Error> for ResumeAtsError {
    fn from(err: anyhow::Error) -> Self {
        ResumeAtsError::EmbeddingUnavailable(format!("{:#}", err))
    }
}

impl From<csv::Error> for ResumeAtsError {
    fn from(err: csv::Error) -> Self {
        ResumeAtsError::StorageIo(err.to_string())
    }
}
