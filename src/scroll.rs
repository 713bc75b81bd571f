//! Scroll-proximity signals reported by the rendering side.

use std::time::{Duration, Instant};

/// Geometry of a scrolled container, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    pub scroll_left: f64,
    pub client_width: f64,
    pub scroll_width: f64,
}

impl ScrollMetrics {
    pub fn vertical(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
            ..Self::default()
        }
    }

    pub fn horizontal(scroll_left: f64, client_width: f64, scroll_width: f64) -> Self {
        Self {
            scroll_left,
            client_width,
            scroll_width,
            ..Self::default()
        }
    }

    /// True when either scrollable axis is within `offset` of its end.
    /// An axis whose content fits the viewport never counts.
    pub fn near_end(&self, offset: f64) -> bool {
        let vertical = self.scroll_height != self.client_height
            && self.scroll_top + self.client_height > self.scroll_height - offset;
        let horizontal = self.scroll_width != self.client_width
            && self.scroll_left + self.client_width > self.scroll_width - offset;
        vertical || horizontal
    }
}

/// Lets at most one trigger through per interval. The first is immediate.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Combines proximity and throttling into the single "load more" signal
/// the feed and collection views act on.
#[derive(Debug, Clone)]
pub struct EndTrigger {
    offset: f64,
    throttle: Throttle,
}

impl EndTrigger {
    pub fn new(offset: f64, interval: Duration) -> Self {
        Self {
            offset,
            throttle: Throttle::new(interval),
        }
    }

    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, now: Instant) -> bool {
        metrics.near_end(self.offset) && self.throttle.ready(now)
    }
}
