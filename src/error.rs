use serde::{Serialize, Serializer};
use thiserror::Error;

/// Result alias used across the analysis core
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types for docsight
#[derive(Debug, Error)]
pub enum AppError {
    /// The dispatcher does not know how to read this media type / extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Paginated extraction finished but produced no usable text (e.g. scanned images)
    #[error("No text could be extracted from the document (it may contain only images)")]
    EmptyExtraction,

    /// Underlying open/parse failure in any extractor
    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),

    /// Network/API failure or an empty completion from the AI service
    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    /// Writing the summaries or settings file failed
    #[error("Failed to persist data: {0}")]
    Persistence(String),

    /// Invalid input (missing credential, bad path, invalid settings)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A pipeline run was requested while another one is still active
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
}

impl AppError {
    /// Pipeline stage this error belongs to, used for stage-qualified messages
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_)
            | AppError::EmptyExtraction
            | AppError::ExtractionFailed(_) => "Extraction",
            AppError::SummarizationFailed(_) => "Summarization",
            AppError::Persistence(_) => "Saving",
            AppError::Validation(_) | AppError::AnalysisInProgress => "Validation",
        }
    }

    /// Human-readable message prefixed with the failing stage
    pub fn stage_message(&self) -> String {
        match self {
            AppError::ExtractionFailed(cause)
            | AppError::SummarizationFailed(cause)
            | AppError::Persistence(cause) => format!("{} failed: {}", self.stage(), cause),
            other => format!("{} failed: {}", self.stage(), other),
        }
    }
}

// Tauri commands hand errors to the frontend as plain strings
impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}
