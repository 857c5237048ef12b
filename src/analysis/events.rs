use serde::Serialize;

use crate::analysis::state::PipelineState;
use crate::extraction::PageProgress;
use crate::summaries::Summary;

/// Notification emitted by the orchestrator during a run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    Progress {
        filename: String,
        progress: PageProgress,
    },
    StateChanged {
        state: PipelineState,
        error: Option<String>,
    },
    Completed {
        summary: Summary,
    },
}

impl AnalysisEvent {
    /// Frontend event name this notification is delivered under
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "analysis-progress",
            Self::StateChanged { .. } => "analysis-state",
            Self::Completed { .. } => "analysis-completed",
        }
    }
}

/// Receives orchestrator notifications
pub trait AnalysisEventSink: Send + Sync {
    fn emit(&self, event: AnalysisEvent);
}

/// Sink that drops every event (headless runs, tests)
pub struct NullEventSink;

impl AnalysisEventSink for NullEventSink {
    fn emit(&self, _event: AnalysisEvent) {}
}

/// Tauri implementation of AnalysisEventSink
#[cfg(feature = "desktop")]
pub struct TauriAnalysisEventSink {
    app_handle: tauri::AppHandle,
}

#[cfg(feature = "desktop")]
impl TauriAnalysisEventSink {
    pub fn new(app_handle: tauri::AppHandle) -> Self {
        Self { app_handle }
    }
}

#[cfg(feature = "desktop")]
impl AnalysisEventSink for TauriAnalysisEventSink {
    fn emit(&self, event: AnalysisEvent) {
        use tauri::Emitter;

        if let Err(e) = self.app_handle.emit(event.channel(), &event) {
            tracing::warn!("Failed to emit {} event: {}", event.channel(), e);
        }
    }
}
