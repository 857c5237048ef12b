// Intelligence module - AI summarization of extracted document text

pub mod provider;
pub mod openai_provider;
pub mod noop_provider;
pub mod prompts;
pub mod utils;

pub use provider::{
    AnalysisMode, AvailabilityResult, SummaryProvider, SummaryRequest, SummaryResponse,
};
pub use openai_provider::{OpenAiProvider, ProviderConfig};
pub use noop_provider::NoOpProvider;

use std::sync::Arc;
use tracing::{info, warn};

/// Create a SummaryProvider with graceful fallback to NoOpProvider
///
/// Attempts to create OpenAiProvider from the given config. If it fails
/// (invalid endpoint, HTTP client build error), returns NoOpProvider instead
/// so the rest of the app keeps working.
pub fn create_provider(config: &ProviderConfig) -> Arc<dyn SummaryProvider> {
    match OpenAiProvider::new(config.clone()) {
        Ok(provider) => {
            info!("Intelligence: OpenAI provider initialized");
            Arc::new(provider)
        }
        Err(e) => {
            warn!("Intelligence: failed to initialize provider: {}", e);
            warn!("Intelligence: using NoOpProvider (summarization disabled)");
            Arc::new(NoOpProvider::new(e.to_string()))
        }
    }
}
