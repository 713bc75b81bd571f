use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::app::{FetchError, Result};
use crate::domain::MediaDescriptor;
use crate::fetcher::{FetchRequest, Fetcher};

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://backend.deviantart.com/oembed";

#[derive(Deserialize)]
struct OembedResponse {
    url: Option<String>,
}

/// Resolves art-platform pages to their direct image through oEmbed.
pub struct OembedClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    endpoint: Url,
}

impl OembedClient {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub fn lookup_url(&self, source_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", source_url);
        url
    }

    pub async fn load(
        &self,
        source_url: &str,
        title: &str,
    ) -> std::result::Result<MediaDescriptor, FetchError> {
        let url = self.lookup_url(source_url);
        let body = self.fetcher.fetch(&FetchRequest::get(url.as_str())).await?;
        let response: OembedResponse = serde_json::from_slice(&body)?;

        let src = response
            .url
            .ok_or_else(|| FetchError::Malformed("oembed response has no url".into()))?;

        Ok(MediaDescriptor::Image {
            src,
            alt: title.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;

    #[test]
    fn test_lookup_url_encodes_source() {
        let client =
            OembedClient::new(Arc::new(MockFetcher::new()), DEFAULT_OEMBED_ENDPOINT).unwrap();
        assert_eq!(
            client.lookup_url("http://fav.me/d2enxz7").as_str(),
            "https://backend.deviantart.com/oembed?url=http%3A%2F%2Ffav.me%2Fd2enxz7"
        );
    }

    #[tokio::test]
    async fn test_load_returns_image() {
        let fetcher = Arc::new(MockFetcher::new().route(
            DEFAULT_OEMBED_ENDPOINT,
            r#"{"type": "photo", "url": "https://images.example/full.jpg", "title": "Landscape"}"#,
        ));
        let client = OembedClient::new(fetcher, DEFAULT_OEMBED_ENDPOINT).unwrap();

        let descriptor = client.load("http://fav.me/d2enxz7", "Nice art").await.unwrap();
        assert_eq!(
            descriptor,
            MediaDescriptor::Image {
                src: "https://images.example/full.jpg".into(),
                alt: "Nice art".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_load_without_url_is_malformed() {
        let fetcher = Arc::new(
            MockFetcher::new().route(DEFAULT_OEMBED_ENDPOINT, r#"{"error": "not found"}"#),
        );
        let client = OembedClient::new(fetcher, DEFAULT_OEMBED_ENDPOINT).unwrap();
        let err = client.load("http://fav.me/missing", "T").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
