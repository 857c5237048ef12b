// Insights module - corpus-wide semantic overview of stored summaries

pub mod aggregator;
pub mod types;

pub use aggregator::aggregate;
pub use types::{
    ComplexityDistribution, ComplexityInsight, KeywordInsight, LanguageInsight,
    ReadabilityInsight, ReadabilityLevel, SemanticInsight, ThemeInsight,
};
