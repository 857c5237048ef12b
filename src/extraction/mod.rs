// Extraction module - dispatches a selected document to the right text extractor

pub mod dispatcher;
pub mod pdf;
pub mod text;

pub use dispatcher::{select_strategy, ExtractionStrategy};
pub use pdf::{extract_pages, LopdfSource, PageSource};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// User-selected document, read once by the shell and handed over as bytes
///
/// Only the filename survives into the persisted record; the original path
/// is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub filename: String,
    /// Declared media type (may be empty or generic)
    #[serde(default)]
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Page-wise extraction progress, emitted before each page is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProgress {
    pub page: u32,
    pub total: u32,
}

/// Receives page progress during paginated extraction
pub trait ProgressSink: Send + Sync {
    fn on_page(&self, progress: PageProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(PageProgress) + Send + Sync,
{
    fn on_page(&self, progress: PageProgress) {
        self(progress)
    }
}

/// Extract plain text from a document using the strategy picked by the dispatcher
pub async fn extract_document(
    doc: &DocumentInput,
    progress: Option<&dyn ProgressSink>,
) -> Result<String> {
    let strategy = select_strategy(&doc.media_type, &doc.filename)?;
    info!(
        filename = %doc.filename,
        media_type = %doc.media_type,
        size_bytes = doc.bytes.len(),
        ?strategy,
        "Extraction: starting"
    );

    let text = match strategy {
        ExtractionStrategy::PlainText => text::read_plain(&doc.bytes),
        ExtractionStrategy::Json => text::read_json_pretty(&doc.bytes),
        ExtractionStrategy::LegacyWordProcessor => {
            text::legacy_placeholder(&doc.filename, doc.bytes.len() as u64)
        }
        ExtractionStrategy::Paginated => {
            let source = LopdfSource::open(&doc.bytes)?;
            extract_pages(&source, progress).await?
        }
    };

    info!(filename = %doc.filename, chars = text.chars().count(), "Extraction: done");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_extract_plain_text() {
        let doc = DocumentInput::new("notes.txt", "text/plain", b"hello world".to_vec());
        assert_eq!(extract_document(&doc, None).await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_extract_markdown_by_extension() {
        let doc = DocumentInput::new("README.md", "", b"# Title".to_vec());
        assert_eq!(extract_document(&doc, None).await.unwrap(), "# Title");
    }

    #[tokio::test]
    async fn test_extract_json_is_reindented() {
        let doc = DocumentInput::new("data.json", "application/json", br#"{"a":1}"#.to_vec());
        assert_eq!(
            extract_document(&doc, None).await.unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }

    #[tokio::test]
    async fn test_extract_docx_is_placeholder() {
        let doc = DocumentInput::new("contract.docx", "", vec![0u8; 2048]);
        let text = extract_document(&doc, None).await.unwrap();
        assert!(text.contains("contract.docx"));
        assert!(text.contains("2.00 KB"));
    }

    #[tokio::test]
    async fn test_extract_unsupported() {
        let doc = DocumentInput::new("photo.png", "image/png", vec![1, 2, 3]);
        let err = extract_document(&doc, None).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ref t) if t == "image/png"));
    }

    #[tokio::test]
    async fn test_extract_corrupt_pdf_is_extraction_failed() {
        let doc = DocumentInput::new("broken.pdf", "application/pdf", b"not a pdf at all".to_vec());
        let err = extract_document(&doc, None).await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_closure_is_progress_sink() {
        let seen = std::sync::Mutex::new(Vec::new());
        let sink = |p: PageProgress| seen.lock().unwrap().push(p.page);
        sink.on_page(PageProgress { page: 1, total: 2 });
        sink.on_page(PageProgress { page: 2, total: 2 });
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
