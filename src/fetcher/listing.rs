use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::app::{FetchError, Result};
use crate::domain::{Cursor, Entry, FeedIdentity, Page};
use crate::fetcher::{FetchRequest, Fetcher};

pub const PAGE_SIZE: usize = 25;
pub const DEFAULT_LISTING_BASE: &str = "https://www.reddit.com/";

/// Supplies pages of a feed. The accumulator only sees this seam.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(
        &self,
        identity: &FeedIdentity,
        cursor: &Cursor,
    ) -> std::result::Result<Page, FetchError>;
}

#[derive(Deserialize)]
struct Listing {
    data: Option<ListingData>,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
    after: Option<String>,
}

// Kept raw so one bad child cannot fail its siblings
#[derive(Deserialize)]
struct Child {
    data: serde_json::Value,
}

pub struct ListingClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    base: Url,
}

impl ListingClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, base: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base: directory_url(base)?,
        })
    }

    /// `{base}r/{name}/{sort}.json?t={window}&limit=25&after={cursor}`
    pub fn page_url(
        &self,
        identity: &FeedIdentity,
        cursor: &Cursor,
    ) -> std::result::Result<Url, FetchError> {
        let mut url = self
            .base
            .join(&identity.listing_path())
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("t", identity.window_param())
            .append_pair("limit", &PAGE_SIZE.to_string())
            .append_pair("after", cursor.as_str());

        Ok(url)
    }

    pub fn parse(body: &[u8]) -> std::result::Result<Page, FetchError> {
        let listing: Listing = serde_json::from_slice(body)?;

        let Some(data) = listing.data else {
            return Ok(Page::default());
        };

        let entries = data
            .children
            .into_iter()
            .filter_map(|child| match serde_json::from_value::<Entry>(child.data) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed listing child");
                    None
                }
            })
            .collect();

        Ok(Page {
            entries,
            next_cursor: Cursor::from(data.after),
        })
    }
}

#[async_trait]
impl PageSource for ListingClient {
    async fn fetch_page(
        &self,
        identity: &FeedIdentity,
        cursor: &Cursor,
    ) -> std::result::Result<Page, FetchError> {
        let url = self.page_url(identity, cursor)?;
        let body = self.fetcher.fetch(&FetchRequest::get(url.as_str())).await?;
        let page = Self::parse(&body)?;

        tracing::debug!(
            feed = %identity,
            cursor = %cursor,
            entries = page.entries.len(),
            next = %page.next_cursor,
            "fetched listing page"
        );

        Ok(page)
    }
}

/// Parse a base URL so that relative joins land beneath it.
pub(crate) fn directory_url(base: &str) -> Result<Url> {
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{base}/"))?)
    }
}
