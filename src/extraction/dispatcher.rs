use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// How a document's text is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// Direct UTF-8 read (plain text, markdown, CSV)
    PlainText,
    /// Parse and re-serialize with stable indentation, raw text on parse failure
    Json,
    /// Page-by-page extraction with progress reporting
    Paginated,
    /// Descriptive placeholder only, no content extraction
    LegacyWordProcessor,
}

const WORD_MEDIA_TYPES: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".markdown", ".csv"];

/// Pick an extraction strategy from the declared media type and filename.
///
/// Media type wins when it is specific; the extension covers pickers that
/// report an empty or generic (`application/octet-stream`) type.
pub fn select_strategy(media_type: &str, filename: &str) -> Result<ExtractionStrategy> {
    let media_type = media_type.trim().to_lowercase();
    let name = filename.trim().to_lowercase();
    let has_ext = |ext: &str| name.ends_with(ext);

    if media_type == "application/pdf" || has_ext(".pdf") {
        return Ok(ExtractionStrategy::Paginated);
    }

    if media_type == "application/json" || has_ext(".json") {
        return Ok(ExtractionStrategy::Json);
    }

    if media_type.starts_with("text/") || TEXT_EXTENSIONS.iter().any(|ext| has_ext(ext)) {
        return Ok(ExtractionStrategy::PlainText);
    }

    if WORD_MEDIA_TYPES.contains(&media_type.as_str()) || has_ext(".docx") || has_ext(".doc") {
        return Ok(ExtractionStrategy::LegacyWordProcessor);
    }

    let declared = if media_type.is_empty() {
        "unknown".to_string()
    } else {
        media_type
    };
    Err(AppError::UnsupportedFormat(declared))
}
