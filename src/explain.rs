// Click-to-explain: sentence splitting and a single-slot, cancel-by-replacement request

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex};

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;
use crate::intelligence::SummaryProvider;

/// A run of non-terminators, its terminators, then any closing quotes/brackets;
/// a trailing fragment without a terminator is its own sentence.
static SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^.!?]+[.!?]+[\])'"`’”]*|.+"#).unwrap());

/// Split analysis text into clickable sentences
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Holds at most one in-flight explain request.
///
/// Starting a new request cancels the previous one; a result that arrives
/// after its request was replaced is discarded.
#[derive(Default)]
pub struct ExplainSlot {
    generation: AtomicU64,
    current: Mutex<Option<(u64, CancellationToken)>>,
}

impl ExplainSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` as the latest request.
    ///
    /// `Ok(Some)` when it finished and is still the latest, `Ok(None)` when it
    /// was superseded, `Err` when the latest request itself failed.
    pub async fn request<F>(&self, work: F) -> Result<Option<String>>
    where
        F: Future<Output = Result<String>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        if let Some((previous, old)) = self.slot().replace((generation, token.clone())) {
            debug!(previous, generation, "Explain: superseding in-flight request");
            old.cancel();
        }

        // Frees the slot even when the caller drops this future mid-flight
        let guard = SlotGuard {
            slot: self,
            generation,
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            result = work => Some(result),
        };

        let still_latest = guard.release();

        match outcome {
            Some(result) if still_latest => result.map(Some),
            _ => Ok(None),
        }
    }

    /// Cancel whatever is outstanding (e.g. the explanation panel was closed)
    pub fn cancel(&self) {
        if let Some((_, token)) = self.slot().take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<(u64, CancellationToken)>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

struct SlotGuard<'a> {
    slot: &'a ExplainSlot,
    generation: u64,
}

impl SlotGuard<'_> {
    /// Clear the slot if it still holds this request; true when it did
    fn release(&self) -> bool {
        let mut slot = self.slot.slot();
        match slot.as_ref() {
            Some((current, _)) if *current == self.generation => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Explain one sentence through the provider, replacing any earlier request
pub async fn explain_sentence(
    slot: &ExplainSlot,
    provider: &dyn SummaryProvider,
    sentence: &str,
    context: &str,
    api_key: &str,
) -> Result<Option<String>> {
    slot.request(provider.explain(sentence, context, api_key)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[test]
    fn test_split_basic() {
        let parts = split_sentences("First one. Second one! Third?");
        assert_eq!(parts, vec!["First one.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_split_keeps_closing_quotes_and_trailing_fragment() {
        let parts = split_sentences("He said \"stop.\" Then (quietly.) left without a word");
        assert_eq!(
            parts,
            vec!["He said \"stop.\"", "Then (quietly.)", "left without a word"]
        );
    }

    #[test]
    fn test_split_ellipsis_and_empty() {
        assert_eq!(split_sentences("Wait... what?"), vec!["Wait...", "what?"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[tokio::test]
    async fn test_single_request_returns_result() {
        let slot = ExplainSlot::new();
        let out = slot.request(async { Ok("meaning".to_string()) }).await.unwrap();
        assert_eq!(out.as_deref(), Some("meaning"));
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_failure_of_latest_is_returned() {
        let slot = ExplainSlot::new();
        let out = slot
            .request(async { Err(AppError::SummarizationFailed("down".into())) })
            .await;
        assert!(matches!(out, Err(AppError::SummarizationFailed(_))));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let slot = Arc::new(ExplainSlot::new());
        let (tx, rx) = oneshot::channel::<()>();

        let first = {
            let slot = slot.clone();
            tokio::spawn(async move {
                slot.request(async move {
                    let _ = rx.await;
                    Ok("stale".to_string())
                })
                .await
            })
        };
        // Let the first request install itself
        while !slot.is_pending() {
            tokio::task::yield_now().await;
        }

        let second = slot.request(async { Ok("fresh".to_string()) }).await.unwrap();
        assert_eq!(second.as_deref(), Some("fresh"));

        let _ = tx.send(());
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, None);
    }

    #[tokio::test]
    async fn test_cancel_discards_pending() {
        let slot = Arc::new(ExplainSlot::new());
        let pending = {
            let slot = slot.clone();
            tokio::spawn(async move {
                slot.request(std::future::pending::<Result<String>>()).await
            })
        };
        while !slot.is_pending() {
            tokio::task::yield_now().await;
        }

        slot.cancel();
        assert_eq!(pending.await.unwrap().unwrap(), None);
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_dropped_request_frees_slot() {
        let slot = Arc::new(ExplainSlot::new());
        let task = {
            let slot = slot.clone();
            tokio::spawn(async move {
                slot.request(std::future::pending::<Result<String>>()).await
            })
        };
        while !slot.is_pending() {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!slot.is_pending());
    }
}
