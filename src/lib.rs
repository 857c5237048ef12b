// Module declarations
pub mod analysis;
pub mod error;
pub mod explain;
pub mod extraction;
pub mod files;
pub mod insights;
pub mod intelligence;
pub mod logging;
pub mod semantics;
pub mod settings;
pub mod shortcuts;
pub mod summaries;

#[cfg(feature = "desktop")]
pub mod commands;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::{Arc, RwLock};
    use tauri::Manager;
    use tracing::info;

    use crate::analysis::{AnalysisOrchestrator, TauriAnalysisEventSink};
    use crate::commands;
    use crate::explain::ExplainSlot;
    use crate::files::ScopedFs;
    use crate::intelligence::{create_provider, SummaryProvider};
    use crate::logging;
    use crate::semantics::{HeuristicAnalyzer, SemanticAnalyzer};
    use crate::settings::SettingsManager;
    use crate::shortcuts::ShortcutManager;
    use crate::summaries::{JsonSummaryStore, SummaryStore};

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        if let Some(dir) = logging::logs_dir() {
            logging::init(&dir);
        }

        let result = tauri::Builder::default()
            .plugin(tauri_plugin_global_shortcut::Builder::new().build())
            .setup(|app| {
                // Scoped filesystem rooted at the app data dir
                let fs = ScopedFs::new()
                    .map_err(|e| format!("Failed to initialize app directory: {}", e))?;
                app.manage(fs.clone());

                // SettingsManager (wrapped in Arc<RwLock>) holds the credential and provider config
                let settings_manager = SettingsManager::new()
                    .map_err(|e| format!("Failed to initialize SettingsManager: {}", e))?;
                let provider_config = settings_manager.get().provider;
                app.manage(Arc::new(RwLock::new(settings_manager)));

                // Summarization provider, falling back to NoOp when the config is unusable
                let provider: Arc<dyn SummaryProvider> = create_provider(&provider_config);
                app.manage(provider.clone());

                let store: Arc<dyn SummaryStore> = Arc::new(JsonSummaryStore::new(fs));
                app.manage(store.clone());

                let analyzer: Arc<dyn SemanticAnalyzer> = Arc::new(HeuristicAnalyzer::new());
                app.manage(analyzer);

                let sink = Arc::new(TauriAnalysisEventSink::new(app.handle().clone()));
                app.manage(Arc::new(AnalysisOrchestrator::new(provider, store, sink)));

                app.manage(Arc::new(ExplainSlot::new()));

                ShortcutManager::new(app.handle().clone()).register_shortcuts();

                info!("docsight started");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::analyze_document,
                commands::get_analysis_status,
                commands::list_summaries,
                commands::delete_summary,
                commands::export_summary,
                commands::get_insights,
                commands::analyze_document_semantics,
                commands::batch_analyze_semantics,
                commands::enrich_summary_semantics,
                commands::split_sentences,
                commands::explain_sentence,
                commands::cancel_explanation,
                commands::get_settings,
                commands::update_settings,
                commands::save_api_key,
                commands::remove_api_key,
            ])
            .run(tauri::generate_context!());

        if let Err(e) = result {
            tracing::error!("error while running tauri application: {}", e);
            std::process::exit(1);
        }
    }
}
