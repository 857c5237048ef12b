use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::files::app_base_dir;
use crate::intelligence::{AnalysisMode, ProviderConfig};

/// File name of the settings document inside the app base dir
pub const SETTINGS_FILE: &str = "settings.json";

/// Main settings structure containing all application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// OpenAI credential; absent until the user saves one
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Instruction set used for new analyses
    #[serde(default)]
    pub analysis_mode: AnalysisMode,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Manages settings persistence and provides thread-safe access
pub struct SettingsManager {
    settings_path: PathBuf,
    current_settings: Arc<RwLock<Settings>>,
}

impl SettingsManager {
    /// Creates a new SettingsManager and loads settings from disk
    ///
    /// If the settings file doesn't exist, creates it with default values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The app data directory cannot be determined
    /// - The settings directory cannot be created
    /// - The settings file cannot be read or written
    pub fn new() -> Result<Self> {
        let base_dir = app_base_dir().ok_or_else(|| {
            AppError::Persistence("Failed to determine app data directory".to_string())
        })?;

        Self::new_with_path(base_dir.join(SETTINGS_FILE))
    }

    /// Creates a new SettingsManager with a custom settings path
    ///
    /// This is primarily used for testing but is also used internally by new().
    /// A settings file with invalid JSON is not an error: a warning is logged
    /// and defaults are used.
    pub(crate) fn new_with_path(settings_path: PathBuf) -> Result<Self> {
        if let Some(parent) = settings_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Persistence(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let manager = Self {
            settings_path: settings_path.clone(),
            current_settings: Arc::new(RwLock::new(Settings::default())),
        };

        let settings = if settings_path.exists() {
            manager.load_from_file()?
        } else {
            let defaults = Settings::default();
            manager.save_to_file(&defaults)?;
            defaults
        };

        *manager.write_lock() = settings;
        info!(path = %settings_path.display(), "Settings: loaded");

        Ok(manager)
    }

    /// Returns a clone of the current settings
    pub fn get(&self) -> Settings {
        self.read_lock().clone()
    }

    /// The stored credential, if one is set and non-blank
    pub fn api_key(&self) -> Option<String> {
        self.read_lock()
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    /// Updates settings (validates, persists to disk, then updates in-memory)
    ///
    /// If an error occurs, in-memory state remains unchanged.
    pub fn update(&self, settings: Settings) -> Result<()> {
        Self::validate(&settings)?;

        self.save_to_file(&settings)?;

        *self.write_lock() = settings;
        Ok(())
    }

    /// Store a new credential.
    ///
    /// Memory is updated first so the key is usable for this session even if
    /// writing it to disk fails; the persistence error is still returned.
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation("API key cannot be empty".to_string()));
        }

        let snapshot = {
            let mut current = self.write_lock();
            current.api_key = Some(key.to_string());
            current.clone()
        };

        self.save_to_file(&snapshot).map_err(|e| {
            warn!("Settings: API key kept in memory only: {}", e);
            e
        })
    }

    /// Forget the credential, in memory first and then on disk
    pub fn clear_api_key(&self) -> Result<()> {
        let snapshot = {
            let mut current = self.write_lock();
            current.api_key = None;
            current.clone()
        };

        self.save_to_file(&snapshot).map_err(|e| {
            warn!("Settings: API key removal not persisted: {}", e);
            e
        })
    }

    /// Validates settings schema and constraints
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the provider endpoint is not an http(s) URL
    /// - the model name is empty
    /// - temperature is outside [0.0, 2.0]
    /// - max_tokens is outside [1, 16000]
    /// - timeout_secs is outside [1, 600]
    pub fn validate(settings: &Settings) -> Result<()> {
        let provider = &settings.provider;

        let endpoint = provider.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::Validation(format!(
                "Provider endpoint must start with http:// or https://, got '{}'",
                provider.endpoint
            )));
        }

        if provider.model.trim().is_empty() {
            return Err(AppError::Validation("Model name cannot be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&provider.temperature) {
            return Err(AppError::Validation(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                provider.temperature
            )));
        }

        if !(1..=16_000).contains(&provider.max_tokens) {
            return Err(AppError::Validation(format!(
                "max_tokens must be between 1 and 16000, got {}",
                provider.max_tokens
            )));
        }

        if !(1..=600).contains(&provider.timeout_secs) {
            return Err(AppError::Validation(format!(
                "Timeout must be between 1 and 600 seconds, got {}",
                provider.timeout_secs
            )));
        }

        Ok(())
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Settings> {
        match self.current_settings.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Settings> {
        match self.current_settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Loads settings from disk
    ///
    /// If the file contains invalid JSON, logs a warning and returns defaults
    /// to ensure graceful degradation.
    fn load_from_file(&self) -> Result<Settings> {
        let contents = std::fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Persistence(format!("Failed to read settings file: {}", e)))?;

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Failed to parse settings JSON: {}. Using defaults.", e);
                Ok(Settings::default())
            }
        }
    }

    /// Saves settings to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent partial writes.
    fn save_to_file(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings).map_err(|e| {
            AppError::Persistence(format!("Failed to serialize settings: {}", e))
        })?;

        let temp_path = self.settings_path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|e| {
            AppError::Persistence(format!("Failed to write temporary settings file: {}", e))
        })?;

        std::fs::rename(&temp_path, &self.settings_path)
            .map_err(|e| AppError::Persistence(format!("Failed to rename settings file: {}", e)))?;

        Ok(())
    }
}
