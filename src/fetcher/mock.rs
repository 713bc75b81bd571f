use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::FetchError;
use crate::fetcher::{FetchRequest, Fetcher};

type Route = (String, Result<Vec<u8>, FetchError>);

/// Canned responses keyed by URL prefix, with a log of every request.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url_prefix: &str, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((url_prefix.to_string(), Ok(body.as_bytes().to_vec())));
        self
    }

    pub fn fail(self, url_prefix: &str, err: FetchError) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((url_prefix.to_string(), Err(err)));
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        let routes = self.routes.lock().unwrap();
        routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Err(FetchError::Status(404)))
    }
}
