// Analysis module - the extract → summarize → save pipeline

pub mod events;
pub mod orchestrator;
pub mod state;

pub use events::{AnalysisEvent, AnalysisEventSink, NullEventSink};
#[cfg(feature = "desktop")]
pub use events::TauriAnalysisEventSink;
pub use orchestrator::{AnalysisOrchestrator, AnalysisRequest, DispatchingExtractor, TextExtractor};
pub use state::{PipelineSnapshot, PipelineState};
