use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::files::ScopedFs;
use crate::summaries::store::{Summary, SummaryStore};

/// Backing file name, relative to the app base directory
pub const SUMMARIES_FILE: &str = "document_analysis_summaries.json";

/// Summary store backed by a single pretty-printed JSON array
///
/// `add`/`delete`/`save` hold `write_lock` across the whole load-modify-save
/// cycle, so writers sharing one instance never lose each other's updates.
/// Another process (or a second instance over the same file) is not
/// coordinated with: the last full save wins.
pub struct JsonSummaryStore {
    fs: ScopedFs,
    file_name: String,
    write_lock: Mutex<()>,
}

impl JsonSummaryStore {
    pub fn new(fs: ScopedFs) -> Self {
        Self::with_file_name(fs, SUMMARIES_FILE)
    }

    pub fn with_file_name(fs: ScopedFs, file_name: &str) -> Self {
        Self {
            fs,
            file_name: file_name.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Vec<Summary> {
        match self.fs.exists(&self.file_name).await {
            Ok(true) => {}
            Ok(false) => return Vec::new(),
            Err(e) => {
                warn!("Summaries: cannot resolve {}: {}", self.file_name, e);
                return Vec::new();
            }
        }

        let contents = match self.fs.read_text(&self.file_name).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Summaries: failed to read store, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Summary>>(&contents) {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!("Summaries: failed to parse store JSON, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn write_all(&self, all: &[Summary]) -> Result<()> {
        let json = serde_json::to_string_pretty(all)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize summaries: {}", e)))?;
        self.fs.write_text(&self.file_name, &json).await?;
        debug!(count = all.len(), "Summaries: store written");
        Ok(())
    }
}

#[async_trait]
impl SummaryStore for JsonSummaryStore {
    async fn load(&self) -> Vec<Summary> {
        self.read_all().await
    }

    async fn save(&self, all: Vec<Summary>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_all(&all).await
    }

    async fn add(&self, record: Summary) -> Result<Vec<Summary>> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await;
        if all.iter().any(|s| s.id == record.id) {
            return Err(AppError::Validation(format!(
                "A summary with id {} already exists",
                record.id
            )));
        }

        all.insert(0, record);
        self.write_all(&all).await?;
        Ok(all)
    }

    async fn delete(&self, id: i64) -> Result<Vec<Summary>> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await;
        if let Some(pos) = all.iter().position(|s| s.id == id) {
            all.remove(pos);
        }

        self.write_all(&all).await?;
        Ok(all)
    }
}
