use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::Geocoder;
use crate::models::Suggestion;

/// Latest applied suggestion list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionState {
    /// Sequence number of the request that produced this state, 0 before any.
    pub seq: u64,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub error: Option<String>,
}

/// Debounced, fenced type-ahead search.
///
/// A trigger only reaches the geocoder after `delay` without another
/// trigger. Each request that is sent gets the next sequence number, and its
/// answer is published only if no newer request was sent in the meantime.
/// In-flight requests are never aborted, just ignored when stale.
#[derive(Clone)]
pub struct SuggestionFeed {
    geocoder: Arc<dyn Geocoder>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    issued: Arc<AtomicU64>,
    tx: Arc<watch::Sender<SuggestionState>>,
}

impl SuggestionFeed {
    pub fn new(geocoder: Arc<dyn Geocoder>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(SuggestionState::default());
        Self {
            geocoder,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            issued: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> SuggestionState {
        self.tx.borrow().clone()
    }

    /// Highest sequence number handed out. Blank queries take one without
    /// reaching the geocoder.
    pub fn issued_requests(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Register a keystroke. Supersedes any trigger still waiting out its
    /// delay. A blank query clears the list at once without a request.
    pub fn trigger(&self, query: &str) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim().to_string();

        if query.is_empty() {
            // also fences any request still in flight
            self.tx.send_modify(|current| {
                let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
                *current = SuggestionState {
                    seq,
                    ..SuggestionState::default()
                };
            });
            return tokio::spawn(async {});
        }

        let feed = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(feed.delay).await;
            if feed.generation.load(Ordering::SeqCst) != generation {
                tracing::trace!(query = %query, "Suggestion trigger superseded");
                return;
            }

            let seq = feed.issued.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(seq, query = %query, "Fetching suggestions");
            let result = feed.geocoder.suggest(&query).await;

            let state = match result {
                Ok(places) => SuggestionState {
                    seq,
                    query,
                    suggestions: places.iter().map(Suggestion::from).collect(),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(%e, "Suggestion fetch failed");
                    SuggestionState {
                        seq,
                        query,
                        suggestions: Vec::new(),
                        error: Some(e.user_message()),
                    }
                }
            };
            // checked under the channel lock so a newer request cannot slip in
            // between the staleness test and the write
            let published = feed.tx.send_if_modified(|current| {
                if feed.issued.load(Ordering::SeqCst) != seq || current.seq > seq {
                    return false;
                }
                *current = state;
                true
            });
            if !published {
                tracing::debug!(seq, "Dropping stale suggestions");
            }
        })
    }
}
