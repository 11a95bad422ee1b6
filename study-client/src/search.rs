//! Timer-driving layer around the pure search debounce machine.
//!
//! [`SearchState`](studyhall_core::SearchState) decides what should happen;
//! this dispatcher makes it happen: it arms and aborts the real `tokio`
//! sleep, feeds timer fires back into the machine, and emits the settled
//! query on a channel the owning screen consumes.
//!
//! The dispatcher never issues network calls itself. The screen receiving a
//! [`SearchDispatch::Search`] calls the document service's title search; a
//! [`SearchDispatch::ListAll`] sends it back to the paginated list read.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use studyhall_core::{SearchAction, SearchInput, SearchState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The default window: keystrokes closer together than this coalesce.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What the settled search field asks the consumer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDispatch {
    /// The field settled on a non-empty query: issue the title search.
    Search(String),
    /// The field settled empty: go back to the paginated list.
    ListAll,
}

struct DispatcherInner {
    state: Mutex<SearchState>,
    timer: Mutex<Option<JoinHandle<()>>>,
    delay: Duration,
    tx: mpsc::UnboundedSender<SearchDispatch>,
}

/// Debounced search input front-end for one screen.
///
/// One dispatcher per search field. Keystrokes go in through
/// [`query_changed`](SearchDispatcher::query_changed); settled dispatches
/// come out of the receiver returned by [`SearchDispatcher::new`]. Dropping
/// the dispatcher cancels any armed timer.
pub struct SearchDispatcher {
    inner: Arc<DispatcherInner>,
}

impl SearchDispatcher {
    /// Create a dispatcher and the channel its dispatches arrive on.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<SearchDispatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(DispatcherInner {
            state: Mutex::new(SearchState::new()),
            timer: Mutex::new(None),
            delay,
            tx,
        });
        (Self { inner }, rx)
    }

    /// Feed a keystroke: the full current content of the search field.
    pub fn query_changed(&self, query: impl Into<String>) {
        apply(
            &self.inner,
            SearchInput::QueryChanged {
                query: query.into(),
            },
        );
    }

    /// Whether a dispatch is armed and waiting for the field to settle.
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().unwrap().is_pending()
    }
}

impl Drop for SearchDispatcher {
    fn drop(&mut self) {
        apply(&self.inner, SearchInput::Teardown);
    }
}

/// Run one input through the machine and execute the resulting actions.
///
/// Both the state transition and the action execution happen under no outer
/// lock ordering concerns: `state` is taken first and released before the
/// timer lock, in both this function and the spawned fire path.
fn apply(inner: &Arc<DispatcherInner>, input: SearchInput) {
    let actions = {
        let mut state = inner.state.lock().unwrap();
        let (next, actions) = std::mem::take(&mut *state).on_input(input);
        *state = next;
        actions
    };

    for action in actions {
        match action {
            SearchAction::CancelTimer => {
                if let Some(handle) = inner.timer.lock().unwrap().take() {
                    handle.abort();
                }
            }
            SearchAction::StartTimer { generation } => {
                let weak = Arc::downgrade(inner);
                let delay = inner.delay;
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    // The dispatcher may have been dropped while we slept.
                    if let Some(inner) = weak.upgrade() {
                        apply(&inner, SearchInput::TimerFired { generation });
                    }
                });
                *inner.timer.lock().unwrap() = Some(handle);
            }
            SearchAction::Search { query } => {
                // A closed receiver means the screen is gone; nothing to do.
                let _ = inner.tx.send(SearchDispatch::Search(query));
            }
            SearchAction::ListAll => {
                let _ = inner.tx.send(SearchDispatch::ListAll);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `start_paused` auto-advances the clock whenever every task is blocked
    // on time, so the armed sleep fires without real waiting.

    #[tokio::test(start_paused = true)]
    async fn settled_query_dispatches_once() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("S");
        dispatcher.query_changed("Se");
        dispatcher.query_changed("Sea");

        assert_eq!(rx.recv().await, Some(SearchDispatch::Search("Sea".to_string())));
        // Nothing further: the superseded generations dispatched nothing.
        tokio::time::sleep(DEFAULT_DEBOUNCE * 4).await;
        assert!(rx.try_recv().is_err());
        assert!(!dispatcher.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_keystrokes_each_dispatch() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("alpha");
        assert_eq!(
            rx.recv().await,
            Some(SearchDispatch::Search("alpha".to_string()))
        );

        dispatcher.query_changed("beta");
        assert_eq!(
            rx.recv().await,
            Some(SearchDispatch::Search("beta".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_field_reverts_to_list() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("Sea");
        assert_eq!(rx.recv().await, Some(SearchDispatch::Search("Sea".to_string())));

        dispatcher.query_changed("");
        assert_eq!(rx.recv().await, Some(SearchDispatch::ListAll));
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_query_reverts_to_list() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("   ");

        assert_eq!(rx.recv().await, Some(SearchDispatch::ListAll));
    }

    #[tokio::test(start_paused = true)]
    async fn typing_during_window_supersedes_earlier_query() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("wrong");
        // Partway through the window, the query changes again.
        tokio::time::sleep(DEFAULT_DEBOUNCE / 2).await;
        dispatcher.query_changed("right");

        assert_eq!(
            rx.recv().await,
            Some(SearchDispatch::Search("right".to_string()))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_armed_timer() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);

        dispatcher.query_changed("Sea");
        drop(dispatcher);

        tokio::time::sleep(DEFAULT_DEBOUNCE * 4).await;
        // The channel closed without ever dispatching.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_flag_tracks_window() {
        let (dispatcher, mut rx) = SearchDispatcher::new(DEFAULT_DEBOUNCE);
        assert!(!dispatcher.is_pending());

        dispatcher.query_changed("S");
        assert!(dispatcher.is_pending());

        rx.recv().await.unwrap();
        assert!(!dispatcher.is_pending());
    }
}
