use std::collections::HashSet;

use crate::app::FetchError;
use crate::domain::{Cursor, Entry, FeedIdentity, Page};

/// Lifecycle of one feed.
///
/// ```text
/// Empty ──load──▶ Loading ──page, more──▶ Idle ──load──▶ Loading
///                    │  └──page, last───▶ Exhausted
///                    └────error─────────▶ Errored ──load──▶ Loading
/// any ──reset──▶ Empty
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Empty,
    Loading,
    /// At least one page applied and more are available.
    Idle,
    Exhausted,
    Errored(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    LoadRequested,
    PageApplied { has_more: bool },
    FetchFailed(FetchError),
    Reset,
}

impl FeedState {
    /// The transition table. `None` means the event is not valid in this
    /// state and must be ignored.
    pub fn transition(&self, event: &FeedEvent) -> Option<FeedState> {
        match (self, event) {
            (_, FeedEvent::Reset) => Some(FeedState::Empty),
            (
                FeedState::Empty | FeedState::Idle | FeedState::Errored(_),
                FeedEvent::LoadRequested,
            ) => Some(FeedState::Loading),
            (FeedState::Loading, FeedEvent::PageApplied { has_more: true }) => {
                Some(FeedState::Idle)
            }
            (FeedState::Loading, FeedEvent::PageApplied { has_more: false }) => {
                Some(FeedState::Exhausted)
            }
            (FeedState::Loading, FeedEvent::FetchFailed(err)) => {
                Some(FeedState::Errored(err.clone()))
            }
            _ => None,
        }
    }
}

/// What a caller needs to issue a page fetch, and what the accumulator
/// checks the result against when it comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    identity: FeedIdentity,
    cursor: Cursor,
    epoch: u64,
}

impl PageTicket {
    pub fn identity(&self) -> &FeedIdentity {
        &self.identity
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fetch was already in flight, or the feed is exhausted.
    Skipped,
    Applied { added: usize, duplicates: usize },
    Failed(FetchError),
    /// The result belonged to a feed that has since been reset.
    Stale,
}

/// Append-only, de-duplicated entry list for one feed identity.
///
/// Fetching is split in two so no borrow is held across the await:
/// [`begin_load`](Self::begin_load) hands out a ticket, the caller fetches,
/// and [`complete`](Self::complete) applies the result only if the ticket
/// still matches the current feed.
#[derive(Debug)]
pub struct FeedAccumulator {
    identity: FeedIdentity,
    entries: Vec<Entry>,
    seen_ids: HashSet<String>,
    cursor: Cursor,
    consumed: HashSet<Cursor>,
    state: FeedState,
    epoch: u64,
}

impl FeedAccumulator {
    pub fn new(identity: FeedIdentity) -> Self {
        Self {
            identity,
            entries: Vec::new(),
            seen_ids: HashSet::new(),
            cursor: Cursor::start(),
            consumed: HashSet::new(),
            state: FeedState::Empty,
            epoch: 0,
        }
    }

    pub fn identity(&self) -> &FeedIdentity {
        &self.identity
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.state == FeedState::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == FeedState::Exhausted
    }

    /// Drop everything and start over at the beginning of `identity`.
    /// Any fetch still in flight will be discarded when it completes.
    pub fn reset(&mut self, identity: FeedIdentity) {
        tracing::debug!(from = %self.identity, to = %identity, "resetting feed");
        self.apply(&FeedEvent::Reset);
        self.identity = identity;
        self.entries.clear();
        self.seen_ids.clear();
        self.cursor = Cursor::start();
        self.consumed.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Reset only if `identity` differs from the current one.
    pub fn switch_to(&mut self, identity: FeedIdentity) -> bool {
        if identity == self.identity {
            return false;
        }
        self.reset(identity);
        true
    }

    /// Move to `Loading` and hand out the request to make, unless a fetch
    /// is already running or the feed is exhausted.
    pub fn begin_load(&mut self) -> Option<PageTicket> {
        if !self.apply(&FeedEvent::LoadRequested) {
            return None;
        }

        Some(PageTicket {
            identity: self.identity.clone(),
            cursor: self.cursor.clone(),
            epoch: self.epoch,
        })
    }

    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Page, FetchError>,
    ) -> LoadOutcome {
        if !self.is_current(&ticket) {
            tracing::warn!(
                feed = %ticket.identity,
                cursor = %ticket.cursor,
                "discarding stale page"
            );
            return LoadOutcome::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(feed = %self.identity, error = %err, "page fetch failed");
                self.apply(&FeedEvent::FetchFailed(err.clone()));
                return LoadOutcome::Failed(err);
            }
        };

        let incoming = page.entries.len();
        let before = self.entries.len();
        for entry in page.entries {
            if self.seen_ids.insert(entry.id.clone()) {
                self.entries.push(entry);
            }
        }
        let added = self.entries.len() - before;
        let duplicates = incoming - added;

        self.consumed.insert(ticket.cursor);

        // An empty, repeated or already-consumed cursor would loop forever
        let next = page.next_cursor;
        let has_more = !next.is_empty() && !self.consumed.contains(&next);
        if has_more {
            self.cursor = next;
        }
        self.apply(&FeedEvent::PageApplied { has_more });

        tracing::info!(feed = %self.identity, added, duplicates, has_more, "applied page");

        LoadOutcome::Applied { added, duplicates }
    }

    fn is_current(&self, ticket: &PageTicket) -> bool {
        ticket.epoch == self.epoch
            && ticket.identity == self.identity
            && ticket.cursor == self.cursor
            && self.state == FeedState::Loading
    }

    fn apply(&mut self, event: &FeedEvent) -> bool {
        match self.state.transition(event) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }
}
