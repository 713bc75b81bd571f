//! Lazy expansion of album and gallery descriptors into their children.
//!
//! One [`CollectionExpander`] lives as long as the rendered collection. The
//! manifest is fetched once on the first [`expand`](CollectionExpander::expand)
//! and cached; changing the reveal count only re-slices it. A failed fetch
//! stays failed until a new expander is created (the next mount).

use std::time::{Duration, Instant};

use crate::app::FetchError;
use crate::domain::{CollectionKind, MediaDescriptor};
use crate::fetcher::{Manifest, ManifestClient};
use crate::resolver;
use crate::scroll::{EndTrigger, ScrollMetrics};

pub const DEFAULT_REVEAL_STEP: usize = 5;
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 500.0;
pub const DEFAULT_TRIGGER_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub url: String,
    pub title: String,
}

impl CollectionItem {
    /// Children go through the same resolver as top-level entries.
    pub fn resolve(&self) -> MediaDescriptor {
        resolver::resolve(&self.url, &self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub items: Vec<CollectionItem>,
    pub total: usize,
}

impl Expansion {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.items.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpanderState {
    Pending,
    Loaded(Manifest),
    Failed(FetchError),
}

pub struct CollectionExpander {
    kind: CollectionKind,
    id: String,
    item_title_prefix: String,
    reveal_count: usize,
    step: usize,
    state: ExpanderState,
    trigger: EndTrigger,
}

impl CollectionExpander {
    pub fn new(
        kind: CollectionKind,
        id: impl Into<String>,
        item_title_prefix: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            item_title_prefix: item_title_prefix.into(),
            reveal_count: DEFAULT_REVEAL_STEP,
            step: DEFAULT_REVEAL_STEP,
            state: ExpanderState::Pending,
            trigger: EndTrigger::new(DEFAULT_SCROLL_THRESHOLD, DEFAULT_TRIGGER_INTERVAL),
        }
    }

    /// `None` for anything that is not a collection.
    pub fn for_descriptor(descriptor: &MediaDescriptor) -> Option<Self> {
        match descriptor {
            MediaDescriptor::Collection {
                kind,
                id,
                item_title_prefix,
            } => Some(Self::new(*kind, id.clone(), item_title_prefix.clone())),
            _ => None,
        }
    }

    pub fn with_reveal(mut self, initial: usize, step: usize) -> Self {
        self.reveal_count = initial;
        self.step = step.max(1);
        self
    }

    pub fn with_trigger(mut self, threshold: f64, interval: Duration) -> Self {
        self.trigger = EndTrigger::new(threshold, interval);
        self
    }

    pub fn state(&self) -> &ExpanderState {
        &self.state
    }

    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    /// Fetch the manifest if this is the first call, then return the
    /// revealed prefix.
    pub async fn expand(&mut self, client: &ManifestClient) -> Result<Expansion, FetchError> {
        if let ExpanderState::Pending = self.state {
            match client.fetch(self.kind, &self.id).await {
                Ok(manifest) => self.state = ExpanderState::Loaded(manifest),
                Err(err) => {
                    tracing::warn!(
                        kind = self.kind.as_str(),
                        id = %self.id,
                        error = %err,
                        "collection manifest failed"
                    );
                    self.state = ExpanderState::Failed(err);
                }
            }
        }

        match &self.state {
            ExpanderState::Failed(err) => Err(err.clone()),
            _ => Ok(self.expansion().unwrap_or(Expansion {
                items: Vec::new(),
                total: 0,
            })),
        }
    }

    /// The revealed items, once the manifest is loaded.
    pub fn expansion(&self) -> Option<Expansion> {
        let ExpanderState::Loaded(manifest) = &self.state else {
            return None;
        };

        let items = manifest
            .images
            .iter()
            .take(self.reveal_count)
            .enumerate()
            .map(|(index, image)| {
                let suffix = image
                    .title
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| index.to_string());
                CollectionItem {
                    url: image.link.clone(),
                    title: format!("{} {}", self.item_title_prefix, suffix),
                }
            })
            .collect();

        Some(Expansion {
            items,
            total: manifest.images.len(),
        })
    }

    /// Explicit "load more". Returns the new reveal count.
    pub fn reveal_more(&mut self) -> usize {
        self.reveal_count = self.reveal_count.saturating_add(self.step);
        self.reveal_count
    }

    /// Reveal more when the strip is scrolled close to its end. Only acts
    /// once the manifest is loaded and something is still hidden.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, now: Instant) -> bool {
        let has_hidden = self
            .expansion()
            .map(|e| e.remaining() > 0)
            .unwrap_or(false);
        if !has_hidden {
            return false;
        }

        if self.trigger.on_scroll(metrics, now) {
            self.reveal_more();
            true
        } else {
            false
        }
    }
}
