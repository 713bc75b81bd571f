use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;

use crate::app::FetchError;
use crate::fetcher::{FetchRequest, Fetcher};

pub const DEFAULT_USER_AGENT: &str = "subscroll/0.1.0";

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_USER_AGENT, Duration::from_secs(10))
    }

    pub fn with_options(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(auth) = &request.authorization {
            let value = HeaderValue::from_str(auth)
                .map_err(|e| FetchError::Network(format!("invalid authorization header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!(url = %request.url, "GET");
        let response = self.client.get(&request.url).headers(headers).send().await?;

        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        Ok(body)
    }
}
