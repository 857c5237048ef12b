use serde::{Deserialize, Serialize};

use crate::extraction::PageProgress;

// MARK: - PipelineState

/// Stage of a single analysis run.
///
/// Runs move strictly forward: Idle → Extracting → Analyzing → Saving →
/// Completed. `Failed` is reachable from any non-terminal stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    #[default]
    Idle,
    Extracting,
    Analyzing,
    Saving,
    Completed,
    Failed,
}

impl PipelineState {
    /// True while a run owns the pipeline
    pub fn is_active(self) -> bool {
        matches!(self, Self::Extracting | Self::Analyzing | Self::Saving)
    }

    /// Whether `next` is a legal forward move from `self`
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Idle | Completed | Failed, Extracting) => true,
            (Extracting, Analyzing) | (Analyzing, Saving) | (Saving, Completed) => true,
            (Extracting | Analyzing | Saving, Failed) => true,
            _ => false,
        }
    }
}

// MARK: - PipelineSnapshot

/// Observable pipeline state for the UI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub state: PipelineState,
    /// Document being processed (cleared once the run ends)
    pub filename: Option<String>,
    pub progress: Option<PageProgress>,
    /// Stage-qualified message of the last failed run
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use PipelineState::*;
        assert!(Idle.can_transition_to(Extracting));
        assert!(Extracting.can_transition_to(Analyzing));
        assert!(Analyzing.can_transition_to(Saving));
        assert!(Saving.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Extracting));
        assert!(Failed.can_transition_to(Extracting));
    }

    #[test]
    fn test_no_backward_or_skipping_moves() {
        use PipelineState::*;
        assert!(!Analyzing.can_transition_to(Extracting));
        assert!(!Extracting.can_transition_to(Saving));
        assert!(!Idle.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Saving.can_transition_to(Extracting));
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_string(&PipelineState::Analyzing).unwrap();
        assert_eq!(json, "\"analyzing\"");
    }

    #[test]
    fn test_is_active() {
        assert!(PipelineState::Saving.is_active());
        assert!(!PipelineState::Completed.is_active());
        assert!(!PipelineState::Idle.is_active());
    }
}
