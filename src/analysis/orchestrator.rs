use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::analysis::events::{AnalysisEvent, AnalysisEventSink};
use crate::analysis::state::{PipelineSnapshot, PipelineState};
use crate::error::{AppError, Result};
use crate::extraction::{extract_document, DocumentInput, PageProgress, ProgressSink};
use crate::intelligence::utils::{truncate_for_analysis, MAX_ANALYSIS_CHARS};
use crate::intelligence::{AnalysisMode, SummaryProvider, SummaryRequest};
use crate::summaries::{Summary, SummaryStore};

/// Turns a selected document into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, doc: &DocumentInput, progress: &dyn ProgressSink) -> Result<String>;
}

/// Extractor that routes through the format dispatcher
pub struct DispatchingExtractor;

#[async_trait]
impl TextExtractor for DispatchingExtractor {
    async fn extract(&self, doc: &DocumentInput, progress: &dyn ProgressSink) -> Result<String> {
        extract_document(doc, Some(progress)).await
    }
}

/// One pipeline run request
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document: DocumentInput,
    pub api_key: String,
    pub mode: AnalysisMode,
}

/// Drives extract → summarize → save for one document at a time
pub struct AnalysisOrchestrator {
    provider: Arc<dyn SummaryProvider>,
    store: Arc<dyn SummaryStore>,
    sink: Arc<dyn AnalysisEventSink>,
    extractor: Arc<dyn TextExtractor>,
    snapshot: Mutex<PipelineSnapshot>,
}

impl AnalysisOrchestrator {
    pub fn new(
        provider: Arc<dyn SummaryProvider>,
        store: Arc<dyn SummaryStore>,
        sink: Arc<dyn AnalysisEventSink>,
    ) -> Self {
        Self::with_extractor(provider, store, sink, Arc::new(DispatchingExtractor))
    }

    pub fn with_extractor(
        provider: Arc<dyn SummaryProvider>,
        store: Arc<dyn SummaryStore>,
        sink: Arc<dyn AnalysisEventSink>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            provider,
            store,
            sink,
            extractor,
            snapshot: Mutex::new(PipelineSnapshot::default()),
        }
    }

    /// Current observable pipeline state
    pub fn snapshot(&self) -> PipelineSnapshot {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.snapshot().state.is_active()
    }

    /// Run the whole pipeline for one document.
    ///
    /// Returns the persisted record, or the error that stopped the run. On
    /// failure nothing is written and the snapshot carries a stage-qualified
    /// message.
    pub async fn run(&self, request: AnalysisRequest) -> Result<Summary> {
        let api_key = request.api_key.trim().to_string();
        if api_key.is_empty() {
            let e = AppError::Validation(
                "An OpenAI API key is required before analyzing documents".to_string(),
            );
            self.reject(&e);
            return Err(e);
        }

        self.begin(&request.document.filename)?;
        info!(
            filename = %request.document.filename,
            mode = ?request.mode,
            "Analysis: run started"
        );

        match self.execute(&request.document, api_key, request.mode).await {
            Ok(summary) => {
                self.finish_ok(&summary);
                Ok(summary)
            }
            Err(e) => {
                self.finish_err(&e);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        document: &DocumentInput,
        api_key: String,
        mode: AnalysisMode,
    ) -> Result<Summary> {
        let filename = document.filename.clone();
        let on_page = |progress: PageProgress| self.report_progress(&filename, progress);
        let text = self.extractor.extract(document, &on_page).await?;

        self.transition(PipelineState::Analyzing);
        let (text, truncated) = truncate_for_analysis(&text, MAX_ANALYSIS_CHARS);
        if truncated {
            debug!(filename = %filename, "Analysis: text truncated to {} chars", MAX_ANALYSIS_CHARS);
        }

        let response = self
            .provider
            .summarize(SummaryRequest {
                text,
                filename: filename.clone(),
                api_key,
                mode,
            })
            .await?;
        if response.analyse.trim().is_empty() {
            return Err(AppError::SummarizationFailed(
                "empty response from OpenAI".to_string(),
            ));
        }

        self.transition(PipelineState::Saving);
        let id = self.next_id().await;
        let record = Summary::new(
            id,
            filename,
            Local::now().format("%d/%m/%Y").to_string(),
            response.preview,
            response.analyse,
        );
        self.store.add(record.clone()).await?;

        Ok(record)
    }

    /// Millisecond timestamp, bumped past the largest stored id on collision
    async fn next_id(&self) -> i64 {
        let now = Local::now().timestamp_millis();
        match self.store.max_id().await {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PipelineSnapshot> {
        match self.snapshot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Check-and-enter under one lock so two callers can't both start
    fn begin(&self, filename: &str) -> Result<()> {
        {
            let mut snap = self.lock();
            if snap.state.is_active() {
                warn!(
                    filename,
                    current = ?snap.state,
                    "Analysis: rejected, another run is active"
                );
                return Err(AppError::AnalysisInProgress);
            }
            *snap = PipelineSnapshot {
                state: PipelineState::Extracting,
                filename: Some(filename.to_string()),
                progress: None,
                error: None,
            };
        }
        self.emit_state(PipelineState::Extracting, None);
        Ok(())
    }

    fn transition(&self, next: PipelineState) {
        {
            let mut snap = self.lock();
            debug_assert!(
                snap.state.can_transition_to(next),
                "illegal transition {:?} -> {:?}",
                snap.state,
                next
            );
            snap.state = next;
        }
        debug!(state = ?next, "Analysis: state changed");
        self.emit_state(next, None);
    }

    fn report_progress(&self, filename: &str, progress: PageProgress) {
        self.lock().progress = Some(progress);
        debug!(page = progress.page, total = progress.total, "Analysis: extracting page");
        self.sink.emit(AnalysisEvent::Progress {
            filename: filename.to_string(),
            progress,
        });
    }

    fn finish_ok(&self, summary: &Summary) {
        {
            let mut snap = self.lock();
            snap.state = PipelineState::Completed;
            snap.filename = None;
            snap.progress = None;
            snap.error = None;
        }
        info!(id = summary.id, title = %summary.title, "Analysis: run completed");
        self.emit_state(PipelineState::Completed, None);
        self.sink.emit(AnalysisEvent::Completed {
            summary: summary.clone(),
        });
    }

    fn finish_err(&self, e: &AppError) {
        let message = e.stage_message();
        {
            let mut snap = self.lock();
            snap.state = PipelineState::Failed;
            snap.filename = None;
            snap.progress = None;
            snap.error = Some(message.clone());
        }
        error!("Analysis: {}", message);
        self.emit_state(PipelineState::Failed, Some(message));
    }

    /// Record why a run was refused before it started; an active run is left alone
    fn reject(&self, e: &AppError) {
        let message = e.stage_message();
        let state = {
            let mut snap = self.lock();
            if snap.state.is_active() {
                return;
            }
            snap.error = Some(message.clone());
            snap.state
        };
        warn!("Analysis: {}", message);
        self.emit_state(state, Some(message));
    }

    fn emit_state(&self, state: PipelineState, error: Option<String>) {
        self.sink.emit(AnalysisEvent::StateChanged { state, error });
    }
}
