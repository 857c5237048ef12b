// Semantics module - per-document keyword/theme/language/complexity fields

pub mod heuristic;
pub mod provider;

pub use heuristic::HeuristicAnalyzer;
pub use provider::{SemanticAnalyzer, SemanticFields};
