// SummaryProvider trait - backend-agnostic summarization interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of an availability check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub reason: Option<String>,
}

/// Which instruction set the provider should use
///
/// Chosen by the caller; the core never infers it from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    General,
    Contract,
}

/// Input to a summarization call
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Extracted document text, already truncated and truncation-marked
    pub text: String,
    pub filename: String,
    pub api_key: String,
    pub mode: AnalysisMode,
}

/// Output of a summarization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Short preview, empty when the provider doesn't produce a distinct one
    pub preview: String,
    /// Full analysis (markdown), never empty on success
    pub analyse: String,
}

/// Backend-agnostic summarization provider interface
///
/// This trait abstracts the AI backend so the orchestrator and commands can
/// be tested without network access. The default implementation is
/// OpenAiProvider.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Check if the provider is available and ready to process requests
    async fn check_availability(&self) -> AvailabilityResult;

    /// Summarize a document
    ///
    /// Makes a single attempt; no retries. Returns `SummarizationFailed` on
    /// network/API errors and when the completion is empty.
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse>;

    /// Explain a single sentence, optionally in the context of its document
    ///
    /// Default implementation returns an error for providers that don't support it.
    async fn explain(&self, _sentence: &str, _context: &str, _api_key: &str) -> Result<String> {
        Err(crate::error::AppError::SummarizationFailed(
            "Explain not supported by this provider".to_string(),
        ))
    }
}
