use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::domain::{Entry, FeedIdentity};
use crate::feed::accumulator::{FeedAccumulator, FeedState, LoadOutcome};
use crate::fetcher::PageSource;
use crate::scroll::{EndTrigger, ScrollMetrics};

pub const DEFAULT_SCROLL_THRESHOLD: f64 = 2000.0;
pub const DEFAULT_TRIGGER_INTERVAL: Duration = Duration::from_millis(2000);

/// Copy of the feed for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub identity: FeedIdentity,
    pub entries: Vec<Entry>,
    pub state: FeedState,
}

/// Drives a [`FeedAccumulator`] against a [`PageSource`].
///
/// Cloning shares the same feed. The accumulator lock is never held across
/// a fetch, so `reset` and `snapshot` stay responsive while a page is in
/// flight.
#[derive(Clone)]
pub struct FeedSession {
    source: Arc<dyn PageSource + Send + Sync>,
    accumulator: Arc<Mutex<FeedAccumulator>>,
    trigger: Arc<Mutex<EndTrigger>>,
}

impl FeedSession {
    pub fn new(source: Arc<dyn PageSource + Send + Sync>, identity: FeedIdentity) -> Self {
        Self {
            source,
            accumulator: Arc::new(Mutex::new(FeedAccumulator::new(identity))),
            trigger: Arc::new(Mutex::new(EndTrigger::new(
                DEFAULT_SCROLL_THRESHOLD,
                DEFAULT_TRIGGER_INTERVAL,
            ))),
        }
    }

    pub fn with_trigger(self, threshold: f64, interval: Duration) -> Self {
        Self {
            trigger: Arc::new(Mutex::new(EndTrigger::new(threshold, interval))),
            ..self
        }
    }

    /// Fetch the next page, unless one is already in flight or the feed
    /// is exhausted.
    pub async fn load_more(&self) -> LoadOutcome {
        let ticket = self.accumulator.lock().await.begin_load();
        let Some(ticket) = ticket else {
            tracing::debug!("load_more skipped");
            return LoadOutcome::Skipped;
        };

        let result = self.source.fetch_page(ticket.identity(), ticket.cursor()).await;

        self.accumulator.lock().await.complete(ticket, result)
    }

    pub async fn reset(&self, identity: FeedIdentity) {
        self.accumulator.lock().await.reset(identity);
    }

    /// Returns true if the identity changed and the feed was reset.
    pub async fn switch_to(&self, identity: FeedIdentity) -> bool {
        self.accumulator.lock().await.switch_to(identity)
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let acc = self.accumulator.lock().await;
        FeedSnapshot {
            identity: acc.identity().clone(),
            entries: acc.entries().to_vec(),
            state: acc.state().clone(),
        }
    }

    /// Scroll report from the view. Loads a page when the end is near and
    /// the trigger is not throttled; `None` when nothing was attempted.
    pub async fn on_scroll(&self, metrics: &ScrollMetrics, now: Instant) -> Option<LoadOutcome> {
        let fire = self.trigger.lock().await.on_scroll(metrics, now);
        if fire {
            Some(self.load_more().await)
        } else {
            None
        }
    }
}
