use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::expander;
use crate::feed::session;
use crate::fetcher::http_fetcher::DEFAULT_USER_AGENT;
use crate::fetcher::listing::DEFAULT_LISTING_BASE;
use crate::fetcher::manifest::{DEFAULT_IMGUR_API, DEFAULT_IMGUR_CLIENT_ID};
use crate::fetcher::oembed::DEFAULT_OEMBED_ENDPOINT;

/// Remote endpoints and HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listing host (default: https://www.reddit.com/)
    pub listing_base: String,

    /// Imgur API root used for album and gallery manifests
    pub imgur_api_base: String,

    /// Sent as `Authorization: Client-ID <id>`
    pub imgur_client_id: String,

    pub oembed_endpoint: String,

    pub user_agent: String,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listing_base: DEFAULT_LISTING_BASE.to_string(),
            imgur_api_base: DEFAULT_IMGUR_API.to_string(),
            imgur_client_id: DEFAULT_IMGUR_CLIENT_ID.to_string(),
            oembed_endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Subreddit opened when none is given (default: mapporn)
    pub default_subreddit: String,

    /// Distance from the bottom, in pixels, that triggers the next page
    pub scroll_threshold: f64,

    /// Minimum time between two scroll-triggered loads
    pub trigger_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_subreddit: "mapporn".to_string(),
            scroll_threshold: session::DEFAULT_SCROLL_THRESHOLD,
            trigger_interval_ms: session::DEFAULT_TRIGGER_INTERVAL.as_millis() as u64,
        }
    }
}

impl FeedConfig {
    pub fn trigger_interval(&self) -> Duration {
        Duration::from_millis(self.trigger_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Children shown before any "load more" (default: 5)
    pub initial_reveal: usize,

    /// Children added per "load more" (default: 5)
    pub reveal_step: usize,

    pub scroll_threshold: f64,

    pub trigger_interval_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            initial_reveal: expander::DEFAULT_REVEAL_STEP,
            reveal_step: expander::DEFAULT_REVEAL_STEP,
            scroll_threshold: expander::DEFAULT_SCROLL_THRESHOLD,
            trigger_interval_ms: expander::DEFAULT_TRIGGER_INTERVAL.as_millis() as u64,
        }
    }
}

impl GalleryConfig {
    pub fn trigger_interval(&self) -> Duration {
        Duration::from_millis(self.trigger_interval_ms)
    }
}
