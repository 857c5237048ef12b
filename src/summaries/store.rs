use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted analysis output for one document
///
/// Identity and analysis fields never change once created. Semantic fields
/// come from an external analyzer and are each independently optional;
/// attaching them produces a new record with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Creation instant in milliseconds since the Unix epoch, unique within the store
    pub id: i64,

    /// Original document filename
    pub title: String,

    /// Creation date as day/month/year
    pub date: String,

    /// Short derived text (may be empty)
    pub preview: String,

    /// Full analysis text (markdown)
    pub analyse: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Expected range 0–10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<f64>,

    /// Expected range 0–100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readability_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
}

impl Summary {
    /// Build a record without semantic fields
    pub fn new(
        id: i64,
        title: impl Into<String>,
        date: impl Into<String>,
        preview: impl Into<String>,
        analyse: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            date: date.into(),
            preview: preview.into(),
            analyse: analyse.into(),
            keywords: None,
            themes: None,
            language: None,
            complexity_score: None,
            readability_score: None,
            word_count: None,
            sentiment_score: None,
        }
    }
}

/// Storage interface for summaries - implementations are swappable
///
/// The collection is read and written wholesale. Store order is
/// most-recently-added first.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// All persisted records in store order.
    ///
    /// Never fails: a missing, unreadable or corrupt backing resource reads as
    /// an empty collection.
    async fn load(&self) -> Vec<Summary>;

    /// Replace the entire persisted collection
    async fn save(&self, all: Vec<Summary>) -> Result<()>;

    /// Prepend a record and persist; returns the new full collection
    async fn add(&self, record: Summary) -> Result<Vec<Summary>>;

    /// Remove the record with `id` (no-op if absent) and persist; returns the new full collection
    async fn delete(&self, id: i64) -> Result<Vec<Summary>>;

    /// Highest id currently stored
    async fn max_id(&self) -> Option<i64> {
        self.load().await.iter().map(|s| s.id).max()
    }
}
