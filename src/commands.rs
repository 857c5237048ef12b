use std::sync::{Arc, RwLock};

use tauri::{AppHandle, Emitter, State};
use tracing::{info, warn};

use crate::analysis::{AnalysisOrchestrator, AnalysisRequest, PipelineSnapshot};
use crate::error::{AppError, Result};
use crate::explain::{self, ExplainSlot};
use crate::extraction::DocumentInput;
use crate::files::ScopedFs;
use crate::insights::{self, SemanticInsight};
use crate::intelligence::{AnalysisMode, SummaryProvider};
use crate::semantics::{SemanticAnalyzer, SemanticFields};
use crate::settings::{Settings, SettingsManager};
use crate::summaries::{self, Summary, SummaryStore};

type SettingsState<'a> = State<'a, Arc<RwLock<SettingsManager>>>;

fn read_settings(state: &SettingsState<'_>) -> Result<Settings> {
    let manager = state
        .read()
        .map_err(|e| AppError::Persistence(format!("Failed to acquire read lock: {}", e)))?;
    Ok(manager.get())
}

/// Credential from the settings store; the caller decides what a missing key means
fn stored_api_key(state: &SettingsState<'_>) -> Result<String> {
    let manager = state
        .read()
        .map_err(|e| AppError::Persistence(format!("Failed to acquire read lock: {}", e)))?;
    manager.api_key().ok_or_else(|| {
        AppError::Validation("An OpenAI API key is required before analyzing documents".to_string())
    })
}

// MARK: - Analysis pipeline

/// Analyze a user-selected document end to end
///
/// The frontend reads the picked file and passes its bytes; the path never
/// reaches the backend. Progress and state changes arrive as
/// "analysis-progress" / "analysis-state" events, and the new record as
/// "analysis-completed".
///
/// `mode` defaults to the analysis mode stored in settings.
#[tauri::command]
pub async fn analyze_document(
    filename: String,
    media_type: Option<String>,
    bytes: Vec<u8>,
    mode: Option<AnalysisMode>,
    orchestrator: State<'_, Arc<AnalysisOrchestrator>>,
    settings_manager: SettingsState<'_>,
) -> Result<Summary> {
    let settings = read_settings(&settings_manager)?;

    // A missing key is refused by the orchestrator so the snapshot records why
    let request = AnalysisRequest {
        document: DocumentInput::new(filename, media_type.unwrap_or_default(), bytes),
        api_key: settings.api_key.clone().unwrap_or_default(),
        mode: mode.unwrap_or(settings.analysis_mode),
    };

    orchestrator.run(request).await
}

/// Current pipeline state for UIs that attach mid-run
#[tauri::command]
pub fn get_analysis_status(orchestrator: State<'_, Arc<AnalysisOrchestrator>>) -> PipelineSnapshot {
    orchestrator.snapshot()
}

// MARK: - Summaries

/// All stored summaries, most recent first
#[tauri::command]
pub async fn list_summaries(store: State<'_, Arc<dyn SummaryStore>>) -> Result<Vec<Summary>> {
    Ok(store.load().await)
}

/// Delete a summary by id and return the remaining collection
#[tauri::command]
pub async fn delete_summary(
    id: i64,
    store: State<'_, Arc<dyn SummaryStore>>,
) -> Result<Vec<Summary>> {
    let remaining = store.delete(id).await?;
    info!(id, remaining = remaining.len(), "Summaries: deleted");
    Ok(remaining)
}

/// Write a summary as markdown under the app's exports directory
#[tauri::command]
pub async fn export_summary(
    id: i64,
    store: State<'_, Arc<dyn SummaryStore>>,
    fs: State<'_, ScopedFs>,
) -> Result<String> {
    let summary = store
        .load()
        .await
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::Validation(format!("Summary not found: {}", id)))?;

    let path = summaries::export_summary(&fs, &summary).await?;
    Ok(path.to_string_lossy().into_owned())
}

/// Corpus-wide keyword/theme/language/complexity overview
#[tauri::command]
pub async fn get_insights(store: State<'_, Arc<dyn SummaryStore>>) -> Result<SemanticInsight> {
    let all = store.load().await;
    Ok(insights::aggregate(&all))
}

// MARK: - Semantic analysis

/// Semantic fields for a single piece of text
#[tauri::command]
pub async fn analyze_document_semantics(
    text: String,
    analyzer: State<'_, Arc<dyn SemanticAnalyzer>>,
) -> Result<SemanticFields> {
    analyzer.analyze(&text).await
}

/// Semantic fields for several texts, in input order
#[tauri::command]
pub async fn batch_analyze_semantics(
    texts: Vec<String>,
    analyzer: State<'_, Arc<dyn SemanticAnalyzer>>,
) -> Result<Vec<SemanticFields>> {
    let mut results = Vec::with_capacity(texts.len());
    for text in &texts {
        results.push(analyzer.analyze(text).await?);
    }
    Ok(results)
}

/// Attach semantic fields to a stored summary, computed from its analysis text
///
/// The enriched record takes the original's place in the collection; id,
/// title, date, preview and analysis are carried over unchanged.
#[tauri::command]
pub async fn enrich_summary_semantics(
    id: i64,
    store: State<'_, Arc<dyn SummaryStore>>,
    analyzer: State<'_, Arc<dyn SemanticAnalyzer>>,
) -> Result<Summary> {
    let mut all = store.load().await;
    let pos = all
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::Validation(format!("Summary not found: {}", id)))?;

    let fields = analyzer.analyze(&all[pos].analyse).await?;
    let enriched = fields.apply_to(&all[pos]);
    all[pos] = enriched.clone();

    store.save(all).await?;
    info!(id, "Summaries: semantic fields attached");
    Ok(enriched)
}

// MARK: - Click-to-explain

/// Split analysis text into the sentences the UI renders as clickable
#[tauri::command]
pub fn split_sentences(text: String) -> Vec<String> {
    explain::split_sentences(&text)
}

/// Explain one sentence; a newer request supersedes this one
///
/// Returns `None` when the result arrived after a newer request replaced it.
#[tauri::command]
pub async fn explain_sentence(
    sentence: String,
    context: Option<String>,
    slot: State<'_, Arc<ExplainSlot>>,
    provider: State<'_, Arc<dyn SummaryProvider>>,
    settings_manager: SettingsState<'_>,
) -> Result<Option<String>> {
    let api_key = stored_api_key(&settings_manager)?;
    let provider: Arc<dyn SummaryProvider> = Arc::clone(&provider);
    explain::explain_sentence(
        &slot,
        provider.as_ref(),
        &sentence,
        context.as_deref().unwrap_or(""),
        &api_key,
    )
    .await
}

/// Drop any in-flight explanation (panel closed)
#[tauri::command]
pub fn cancel_explanation(slot: State<'_, Arc<ExplainSlot>>) {
    slot.cancel();
}

// MARK: - Settings

/// Get current application settings
#[tauri::command]
pub fn get_settings(settings_manager: SettingsState<'_>) -> Result<Settings> {
    read_settings(&settings_manager)
}

/// Update application settings
///
/// Emits "settings-changed" on success. Provider endpoint/model changes apply
/// to the next app launch; analysis mode and credential apply immediately.
#[tauri::command]
pub fn update_settings(
    settings: Settings,
    settings_manager: SettingsState<'_>,
    app_handle: AppHandle,
) -> Result<()> {
    {
        let manager = settings_manager
            .read()
            .map_err(|e| AppError::Persistence(format!("Failed to acquire read lock: {}", e)))?;
        manager.update(settings.clone())?;
    }

    emit_settings_changed(&app_handle, &settings);
    Ok(())
}

/// Store the OpenAI credential
///
/// The key is usable for this session even when writing it to disk fails; in
/// that case the persistence error is still returned so the UI can say so.
#[tauri::command]
pub fn save_api_key(
    key: String,
    settings_manager: SettingsState<'_>,
    app_handle: AppHandle,
) -> Result<()> {
    let (result, settings) = {
        let manager = settings_manager
            .read()
            .map_err(|e| AppError::Persistence(format!("Failed to acquire read lock: {}", e)))?;
        (manager.set_api_key(&key), manager.get())
    };

    if !matches!(result, Err(AppError::Validation(_))) {
        emit_settings_changed(&app_handle, &settings);
    }
    result
}

/// Forget the stored OpenAI credential
#[tauri::command]
pub fn remove_api_key(settings_manager: SettingsState<'_>, app_handle: AppHandle) -> Result<()> {
    let (result, settings) = {
        let manager = settings_manager
            .read()
            .map_err(|e| AppError::Persistence(format!("Failed to acquire read lock: {}", e)))?;
        (manager.clear_api_key(), manager.get())
    };

    emit_settings_changed(&app_handle, &settings);
    result
}

fn emit_settings_changed(app_handle: &AppHandle, settings: &Settings) {
    // Never broadcast the credential itself
    let mut redacted = settings.clone();
    redacted.api_key = redacted.api_key.map(|_| "********".to_string());

    if let Err(e) = app_handle.emit("settings-changed", &redacted) {
        warn!("Failed to emit settings-changed event: {}", e);
    }
}
