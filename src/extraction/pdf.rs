use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::extraction::{PageProgress, ProgressSink};

/// A paginated document that yields text items page by page
///
/// Pages are 1-based. Implementations are synchronous; `extract_pages`
/// yields to the runtime between pages so progress reaches the UI.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> u32;

    /// Text fragments of one page, in reading order
    fn page_items(&self, page: u32) -> Result<Vec<String>>;
}

/// PDF page source backed by lopdf
pub struct LopdfSource {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl LopdfSource {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| AppError::ExtractionFailed(format!("could not open PDF: {}", e)))?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(pages = page_numbers.len(), "PDF: document opened");
        Ok(Self { doc, page_numbers })
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_items(&self, page: u32) -> Result<Vec<String>> {
        let number = self
            .page_numbers
            .get(page.saturating_sub(1) as usize)
            .copied()
            .ok_or_else(|| AppError::ExtractionFailed(format!("page {} out of range", page)))?;

        let text = self.doc.extract_text(&[number]).map_err(|e| {
            AppError::ExtractionFailed(format!("could not read page {}: {}", page, e))
        })?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Extract every page in order, reporting progress before each one.
///
/// Each non-blank page contributes `"\n--- Page N ---\n{items joined by a space}\n"`;
/// blank pages are skipped. A document with no text at all (scanned images
/// only) fails with `EmptyExtraction`.
pub async fn extract_pages(
    source: &dyn PageSource,
    progress: Option<&dyn ProgressSink>,
) -> Result<String> {
    let total = source.page_count();
    let mut full_text = String::new();

    for page in 1..=total {
        if let Some(sink) = progress {
            sink.on_page(PageProgress { page, total });
        }

        let items = source.page_items(page)?;
        let page_text = items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !page_text.is_empty() {
            full_text.push_str(&format!("\n--- Page {} ---\n{}\n", page, page_text));
        } else {
            debug!(page, "PDF: page has no text");
        }

        tokio::task::yield_now().await;
    }

    if full_text.trim().is_empty() {
        warn!(pages = total, "PDF: no extractable text");
        return Err(AppError::EmptyExtraction);
    }

    Ok(full_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeSource {
        pages: Vec<Vec<&'static str>>,
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_items(&self, page: u32) -> Result<Vec<String>> {
            Ok(self.pages[(page - 1) as usize]
                .iter()
                .map(|s| s.to_string())
                .collect())
        }
    }

    struct FailingSource;

    impl PageSource for FailingSource {
        fn page_count(&self) -> u32 {
            2
        }

        fn page_items(&self, page: u32) -> Result<Vec<String>> {
            if page == 2 {
                Err(AppError::ExtractionFailed("bad stream".into()))
            } else {
                Ok(vec!["ok".into()])
            }
        }
    }

    #[tokio::test]
    async fn test_three_pages_progress_and_markers() {
        let source = FakeSource {
            pages: vec![vec!["Alpha", "one"], vec!["Beta"], vec!["Gamma", "three"]],
        };
        let seen = Mutex::new(Vec::new());
        let sink = |p: PageProgress| seen.lock().unwrap().push((p.page, p.total));

        let text = extract_pages(&source, Some(&sink)).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(
            text,
            "\n--- Page 1 ---\nAlpha one\n\n--- Page 2 ---\nBeta\n\n--- Page 3 ---\nGamma three\n"
        );
    }

    #[tokio::test]
    async fn test_image_only_pdf_is_empty_extraction() {
        let source = FakeSource {
            pages: vec![vec![], vec!["   "]],
        };
        let err = extract_pages(&source, None).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyExtraction));
    }

    #[tokio::test]
    async fn test_zero_pages_is_empty_extraction() {
        let source = FakeSource { pages: vec![] };
        let err = extract_pages(&source, None).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyExtraction));
    }

    #[tokio::test]
    async fn test_page_failure_propagates() {
        let err = extract_pages(&FailingSource, None).await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(ref m) if m == "bad stream"));
    }

    #[test]
    fn test_lopdf_rejects_garbage() {
        let result = LopdfSource::open(b"%PDF-garbage");
        assert!(matches!(result, Err(AppError::ExtractionFailed(_))));
    }

    #[tokio::test]
    async fn test_blank_page_is_skipped() {
        let source = FakeSource {
            pages: vec![vec![" first "], vec![""], vec!["third"]],
        };
        let text = extract_pages(&source, None).await.unwrap();
        assert_eq!(text, "\n--- Page 1 ---\nfirst\n\n--- Page 3 ---\nthird\n");
    }
}
