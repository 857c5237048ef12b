use serde::{Deserialize, Serialize};

/// Corpus-wide semantic overview, recomputed on demand from stored summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticInsight {
    pub keywords: Vec<KeywordInsight>,
    pub themes: Vec<ThemeInsight>,
    pub languages: Vec<LanguageInsight>,
    pub complexity: ComplexityInsight,
    pub readability: ReadabilityInsight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordInsight {
    pub word: String,
    pub frequency: u32,
    /// Sum over documents of 1 / (keywords in that document)
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInsight {
    pub theme: String,
    pub confidence: f64,
    pub document_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInsight {
    pub language: String,
    pub code: String,
    pub document_count: u32,
    /// Share of all input summaries, including those without a language
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityInsight {
    pub average: f64,
    pub distribution: ComplexityDistribution,
}

/// Bucket counts: simple (≤3), medium (between), complex (≥7)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityDistribution {
    pub simple: u32,
    pub medium: u32,
    pub complex: u32,
}

impl ComplexityDistribution {
    pub fn total(&self) -> u32 {
        self.simple + self.medium + self.complex
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityInsight {
    pub average: f64,
    pub classification: ReadabilityLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadabilityLevel {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Difficult")]
    Difficult,
    #[default]
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl ReadabilityLevel {
    /// Classify an average readability score (0-100)
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VeryEasy
        } else if score >= 60.0 {
            Self::Easy
        } else if score >= 40.0 {
            Self::Moderate
        } else if score >= 20.0 {
            Self::Difficult
        } else {
            Self::VeryDifficult
        }
    }
}
