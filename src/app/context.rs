use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, SubscrollError};
use crate::config::Config;
use crate::domain::{FeedIdentity, MediaDescriptor};
use crate::expander::CollectionExpander;
use crate::feed::FeedSession;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{Fetcher, ListingClient, ManifestClient, OembedClient};
use crate::resolver::Resolver;
use crate::store::sqlite::SqliteOverlayStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteOverlayStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub listing: Arc<ListingClient>,
    pub manifests: ManifestClient,
    pub oembed: OembedClient,
    pub resolver: Resolver,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteOverlayStore::new(&db_path)?);
        let fetcher = Self::http_fetcher(&config)?;
        Self::with_parts(config, store, fetcher)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteOverlayStore::in_memory()?);
        let fetcher = Self::http_fetcher(&config)?;
        Self::with_parts(config, store, fetcher)
    }

    pub fn with_parts(
        config: Config,
        store: Arc<SqliteOverlayStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Self> {
        let listing = Arc::new(ListingClient::new(fetcher.clone(), &config.api.listing_base)?);
        let manifests = ManifestClient::new(
            fetcher.clone(),
            &config.api.imgur_api_base,
            &config.api.imgur_client_id,
        )?;
        let oembed = OembedClient::new(fetcher.clone(), &config.api.oembed_endpoint)?;

        Ok(Self {
            config,
            store,
            fetcher,
            listing,
            manifests,
            oembed,
            resolver: Resolver::builtin(),
        })
    }

    /// A feed session over the listing client, using the configured scroll
    /// trigger.
    pub fn session(&self, identity: FeedIdentity) -> FeedSession {
        FeedSession::new(self.listing.clone(), identity).with_trigger(
            self.config.feed.scroll_threshold,
            self.config.feed.trigger_interval(),
        )
    }

    /// An expander for a collection descriptor, using the configured reveal
    /// sizes.
    pub fn expander(&self, descriptor: &MediaDescriptor) -> Option<CollectionExpander> {
        let gallery = &self.config.gallery;
        CollectionExpander::for_descriptor(descriptor).map(|e| {
            e.with_reveal(gallery.initial_reveal, gallery.reveal_step)
                .with_trigger(gallery.scroll_threshold, gallery.trigger_interval())
        })
    }

    fn http_fetcher(config: &Config) -> Result<Arc<dyn Fetcher + Send + Sync>> {
        let fetcher = HttpFetcher::with_options(&config.api.user_agent, config.api.timeout())?;
        Ok(Arc::new(fetcher))
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SubscrollError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("subscroll");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("subscroll.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlagKind, Sort};
    use crate::feed::LoadOutcome;
    use crate::fetcher::mock::MockFetcher;
    use crate::store::OverlayStore;

    const LISTING: &str = r#"{"data": {"after": null, "children": [
        {"data": {"id": "p1", "name": "t3_p1", "url": "https://imgur.com/a/alb1",
                  "title": "Album", "subreddit": "mapporn"}}
    ]}}"#;

    const ALBUM: &str = r#"{"data": {"images": [
        {"link": "https://i.imgur.com/1.jpg", "title": "one"},
        {"link": "https://i.imgur.com/2.jpg", "title": "two"},
        {"link": "https://i.imgur.com/3.jpg", "title": "three"}
    ]}}"#;

    fn context(config: Config) -> AppContext {
        let fetcher = Arc::new(
            MockFetcher::new()
                .route("https://www.reddit.com/r/mapporn/", LISTING)
                .route("https://api.imgur.com/3/album/alb1", ALBUM),
        );
        let store = Arc::new(SqliteOverlayStore::in_memory().unwrap());
        AppContext::with_parts(config, store, fetcher).unwrap()
    }

    #[tokio::test]
    async fn test_session_and_expander_wiring() {
        let mut config = Config::default();
        config.gallery.initial_reveal = 2;
        let ctx = context(config);

        let session = ctx.session(FeedIdentity::new("mapporn", Sort::Hot, None).unwrap());
        assert_eq!(session.load_more().await, LoadOutcome::Applied { added: 1, duplicates: 0 });

        let snapshot = session.snapshot().await;
        let descriptor = ctx.resolver.resolve(&snapshot.entries[0].url, "Album");
        assert!(matches!(descriptor, MediaDescriptor::Collection { .. }));

        let mut expander = ctx.expander(&descriptor).unwrap();
        let expansion = expander.expand(&ctx.manifests).await.unwrap();
        assert_eq!(expansion.items.len(), 2);
        assert_eq!(expansion.remaining(), 1);
    }

    #[test]
    fn test_in_memory_store_is_usable() {
        let ctx = context(Config::default());
        ctx.store.set("https://i.imgur.com/1.jpg", FlagKind::Hidden, true).unwrap();
        assert!(ctx.store.get("https://i.imgur.com/1.jpg", FlagKind::Hidden).unwrap());
    }

    #[test]
    fn test_bad_endpoint_is_rejected() {
        let mut config = Config::default();
        config.api.oembed_endpoint = "not a url".into();
        let store = Arc::new(SqliteOverlayStore::in_memory().unwrap());
        let result = AppContext::with_parts(config, store, Arc::new(MockFetcher::new()));
        assert!(matches!(result, Err(SubscrollError::InvalidUrl(_))));
    }
}
