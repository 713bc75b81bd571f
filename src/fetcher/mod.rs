pub mod http_fetcher;
pub mod listing;
pub mod manifest;
#[cfg(test)]
pub mod mock;
pub mod oembed;

use async_trait::async_trait;

use crate::app::FetchError;

pub use listing::{ListingClient, PageSource, PAGE_SIZE};
pub use manifest::{Manifest, ManifestClient, ManifestImage};
pub use oembed::OembedClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// Sent verbatim as the `Authorization` header.
    pub authorization: Option<String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            authorization: None,
        }
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }
}

/// Raw GET of a JSON document. Non-2xx responses are errors.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError>;
}
