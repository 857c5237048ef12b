// NoOpProvider - fallback provider when no summarization backend can be built

use async_trait::async_trait;

use super::provider::{AvailabilityResult, SummaryProvider, SummaryRequest, SummaryResponse};
use crate::error::{AppError, Result};

/// No-op provider that always returns unavailable
///
/// Used as a fallback when the configured provider cannot be constructed
/// (e.g. an invalid endpoint in settings). The app keeps working: stored
/// summaries and insights remain available, only new analyses fail.
pub struct NoOpProvider {
    reason: String,
}

impl NoOpProvider {
    /// Create a new NoOpProvider with the given unavailability reason
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl SummaryProvider for NoOpProvider {
    async fn check_availability(&self) -> AvailabilityResult {
        AvailabilityResult {
            available: false,
            reason: Some(self.reason.clone()),
        }
    }

    async fn summarize(&self, _request: SummaryRequest) -> Result<SummaryResponse> {
        Err(AppError::SummarizationFailed(format!(
            "Summarization provider unavailable: {}",
            self.reason
        )))
    }
}
