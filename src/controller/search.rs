//! Debounced live search
//!
//! Each keystroke cancels the pending timer and, for long enough queries,
//! schedules a new one. A timer that fires hands the request to its own
//! task, so cancelling timers never cancels a request already sent; a slow
//! reply may therefore still overwrite the results of a newer query.

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::PageController;
use crate::page::PageMsg;

/// Length of a query as the browser counts it, in UTF-16 code units
pub fn query_len(query: &str) -> usize {
    query.encode_utf16().count()
}

/// Controller for one search box. Owns the box's single pending timer.
pub struct SearchController {
    page: PageController,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(page: PageController) -> Self {
        Self {
            page,
            pending: Mutex::new(None),
        }
    }

    /// The search box's text changed
    pub async fn on_input(&self, text: &str) {
        let mut pending = self.pending.lock().await;
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let query = text.trim();
        if query_len(query) < self.page.config().search_min_chars {
            drop(pending);
            self.page.store().dispatch(PageMsg::SearchHidden).await;
            return;
        }

        let page = self.page.clone();
        let query = query.to_string();
        let delay = self.page.config().search_debounce();

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%query, "Search debounce elapsed");
            tokio::spawn(async move {
                page.perform_search(&query).await;
            });
        }));
    }

    /// Whether a timer is scheduled and has not fired yet
    pub async fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Wait until the pending timer, if any, has fired or been cancelled
    pub async fn settle(&self) {
        let timer = self.pending.lock().await.take();
        if let Some(timer) = timer {
            let _ = timer.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::MockBackend;
    use super::*;
    use crate::api::ProductHit;
    use crate::config::UiConfig;
    use crate::page::{PageState, PageStore, SearchPanel};
    use std::sync::Arc;
    use std::time::Duration;

    fn hit(name: &str) -> ProductHit {
        ProductHit {
            id: "1".into(),
            name: name.into(),
            price: "10.00".into(),
            image: None,
        }
    }

    fn search_box(backend: MockBackend) -> (SearchController, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let page = PageController::new(
            backend.clone(),
            PageStore::new(PageState::default()),
            UiConfig::default(),
        );
        (page.search_box(), backend)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_sends_one_search() {
        let (search, backend) = search_box(MockBackend::new().with_search("shoe", vec![hit("Shoe")]));

        for text in ["sh", "sho", "shoe"] {
            search.on_input(text).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(backend.search_queries().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(backend.search_queries(), vec!["shoe".to_string()]);
        let state = search.page.store().snapshot().await;
        assert_eq!(state.search, SearchPanel::Results(vec![hit("Shoe")]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_hides_without_call() {
        let (search, backend) = search_box(MockBackend::new());
        search.page.store().dispatch(PageMsg::SearchResults(vec![])).await;

        search.on_input(" s ").await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(backend.calls().is_empty());
        assert!(!search.page.store().snapshot().await.search.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_cancels_pending_timer() {
        let (search, backend) = search_box(MockBackend::new());

        search.on_input("shoe").await;
        assert!(search.has_pending().await);
        search.on_input("s").await;
        assert!(!search.has_pending().await);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_emoji_is_long_enough() {
        let (search, backend) = search_box(MockBackend::new());

        search.on_input("\u{1F45F}").await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(backend.search_queries(), vec!["\u{1F45F}".to_string()]);
        let state = search.page.store().snapshot().await;
        assert_eq!(state.search, SearchPanel::Empty);
    }

    #[test]
    fn test_query_len_counts_utf16_units() {
        assert_eq!(query_len("ab"), 2);
        assert_eq!(query_len("\u{e9}"), 1);
        assert_eq!(query_len("\u{1F45F}"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_is_trimmed() {
        let (search, backend) = search_box(MockBackend::new());

        search.on_input("  boots  ").await;
        search.settle().await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(backend.search_queries(), vec!["boots".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_reply_is_not_cancelled() {
        let backend = MockBackend::new()
            .with_slow_search("ab", vec![hit("Slow")], Duration::from_secs(1))
            .with_search("abc", vec![hit("Fast")]);
        let (search, backend) = search_box(backend);

        search.on_input("ab").await;
        // Timer fires at 300ms and the slow request goes out
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.on_input("abc").await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        let state = search.page.store().snapshot().await;
        assert_eq!(state.search, SearchPanel::Results(vec![hit("Fast")]));

        // The older reply lands last and wins
        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = search.page.store().snapshot().await;
        assert_eq!(state.search, SearchPanel::Results(vec![hit("Slow")]));
        assert_eq!(backend.search_queries(), vec!["ab".to_string(), "abc".to_string()]);
    }
}
