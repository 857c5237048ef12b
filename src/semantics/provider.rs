// SemanticAnalyzer trait - per-document semantic fields, decoupled from how they are produced

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::summaries::Summary;

/// Typed semantic fields for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticFields {
    pub keywords: Vec<String>,
    pub themes: Vec<String>,
    pub language: String,
    pub complexity_score: f64,
    pub readability_score: f64,
    pub word_count: u64,
    pub sentiment_score: f64,
}

impl SemanticFields {
    /// New record carrying these fields; every other field is copied unchanged
    pub fn apply_to(&self, summary: &Summary) -> Summary {
        Summary {
            keywords: Some(self.keywords.clone()),
            themes: Some(self.themes.clone()),
            language: Some(self.language.clone()),
            complexity_score: Some(self.complexity_score),
            readability_score: Some(self.readability_score),
            word_count: Some(self.word_count),
            sentiment_score: Some(self.sentiment_score),
            ..summary.clone()
        }
    }
}

/// Backend-agnostic semantic analyzer interface
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SemanticFields>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_keeps_identity_fields() {
        let original = Summary::new(42, "a.txt", "02/03/2026", "prev", "# body");
        let fields = SemanticFields {
            keywords: vec!["alpha".into()],
            themes: vec![],
            language: "English".into(),
            complexity_score: 3.5,
            readability_score: 61.0,
            word_count: 120,
            sentiment_score: 0.1,
        };

        let enriched = fields.apply_to(&original);

        assert_eq!(enriched.id, 42);
        assert_eq!(enriched.title, "a.txt");
        assert_eq!(enriched.analyse, "# body");
        assert_eq!(enriched.language.as_deref(), Some("English"));
        assert_eq!(enriched.word_count, Some(120));
        // Source record untouched
        assert!(original.keywords.is_none());
    }
}
