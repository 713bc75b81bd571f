use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::app::{FetchError, Result};
use crate::domain::CollectionKind;
use crate::fetcher::listing::directory_url;
use crate::fetcher::{FetchRequest, Fetcher};

pub const DEFAULT_IMGUR_API: &str = "https://api.imgur.com/3/";
pub const DEFAULT_IMGUR_CLIENT_ID: &str = "a2657fbb95b9063";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestImage {
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Every child of an album or gallery, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub images: Vec<ManifestImage>,
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<EnvelopeData>,
}

#[derive(Deserialize)]
struct EnvelopeData {
    images: Option<Vec<ManifestImage>>,
    // Single-image galleries carry the image inline instead of a list
    link: Option<String>,
    title: Option<String>,
}

pub struct ManifestClient {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    api_base: Url,
    client_id: String,
}

impl ManifestClient {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        api_base: &str,
        client_id: &str,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            api_base: directory_url(api_base)?,
            client_id: client_id.to_string(),
        })
    }

    /// `{api_base}{kind}/{id}`. The id is pushed as one path segment, so
    /// dots and slashes in it stay inside `{kind}/`.
    pub fn manifest_url(
        &self,
        kind: CollectionKind,
        id: &str,
    ) -> std::result::Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Malformed(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .push(kind.as_str())
            .push(id);
        Ok(url)
    }

    pub async fn fetch(
        &self,
        kind: CollectionKind,
        id: &str,
    ) -> std::result::Result<Manifest, FetchError> {
        let url = self.manifest_url(kind, id)?;
        let request = FetchRequest::get(url.as_str())
            .with_authorization(format!("Client-ID {}", self.client_id));

        let body = self.fetcher.fetch(&request).await?;
        let manifest = Self::parse(&body)?;
        tracing::debug!(
            kind = kind.as_str(),
            id,
            images = manifest.images.len(),
            "fetched collection manifest"
        );
        Ok(manifest)
    }

    pub fn parse(body: &[u8]) -> std::result::Result<Manifest, FetchError> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let data = envelope
            .data
            .ok_or_else(|| FetchError::Malformed("manifest has no data".into()))?;

        let images = match (data.images, data.link) {
            (Some(images), _) => images,
            (None, Some(link)) => vec![ManifestImage {
                link,
                title: data.title,
            }],
            (None, None) => Vec::new(),
        };

        Ok(Manifest { images })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockFetcher;

    const ALBUM: &str = r#"{"data": {"id": "abc123", "images": [
        {"link": "https://i.imgur.com/one.jpg", "title": "first"},
        {"link": "https://i.imgur.com/two.gifv", "title": null},
        {"link": "https://i.imgur.com/three.png"}
    ]}, "success": true, "status": 200}"#;

    #[test]
    fn test_parse_album() {
        let manifest = ManifestClient::parse(ALBUM.as_bytes()).unwrap();
        assert_eq!(manifest.images.len(), 3);
        assert_eq!(manifest.images[0].title.as_deref(), Some("first"));
        assert_eq!(manifest.images[1].title, None);
        assert_eq!(manifest.images[2].link, "https://i.imgur.com/three.png");
    }

    #[test]
    fn test_parse_single_image_gallery() {
        let body =
            br#"{"data": {"id": "x", "link": "https://i.imgur.com/x.jpg", "title": "solo"}}"#;
        let manifest = ManifestClient::parse(body).unwrap();
        assert_eq!(
            manifest.images,
            vec![ManifestImage {
                link: "https://i.imgur.com/x.jpg".into(),
                title: Some("solo".into()),
            }]
        );
    }

    #[test]
    fn test_parse_without_data_is_error() {
        let err = ManifestClient::parse(br#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_fetch_sends_client_credential() {
        let fetcher =
            Arc::new(MockFetcher::new().route("https://api.imgur.com/3/album/abc123", ALBUM));
        let client = ManifestClient::new(fetcher.clone(), DEFAULT_IMGUR_API, "my-client").unwrap();

        let manifest = client.fetch(CollectionKind::Album, "abc123").await.unwrap();
        assert_eq!(manifest.images.len(), 3);

        let requests = fetcher.requests();
        assert_eq!(requests[0].url, "https://api.imgur.com/3/album/abc123");
        assert_eq!(requests[0].authorization.as_deref(), Some("Client-ID my-client"));
    }

    #[test]
    fn test_id_cannot_escape_kind() {
        let client =
            ManifestClient::new(Arc::new(MockFetcher::new()), DEFAULT_IMGUR_API, "id").unwrap();

        let url = client.manifest_url(CollectionKind::Album, "../../credits").unwrap();
        assert!(url.as_str().starts_with("https://api.imgur.com/3/album/"));
        assert_eq!(url.path_segments().unwrap().count(), 3);

        let url = client.manifest_url(CollectionKind::Album, "abc/def").unwrap();
        assert_eq!(url.as_str(), "https://api.imgur.com/3/album/abc%2Fdef");
    }

    #[test]
    fn test_gallery_url() {
        let client =
            ManifestClient::new(Arc::new(MockFetcher::new()), "https://api.imgur.com/3", "id")
                .unwrap();
        assert_eq!(
            client.manifest_url(CollectionKind::Gallery, "Zz9").unwrap().as_str(),
            "https://api.imgur.com/3/gallery/Zz9"
        );
    }
}
