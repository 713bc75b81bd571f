use futures::future::join_all;

use crate::app::{AppContext, Result, SubscrollError};
use crate::domain::{Entry, FeedIdentity, FlagKind, MediaDescriptor};
use crate::feed::{visible_entries, EntryView, FeedState, LoadOutcome};
use crate::store::OverlayStore;

pub async fn browse(ctx: &AppContext, path: Option<&str>, pages: usize) -> Result<()> {
    let path = path.unwrap_or(ctx.config.feed.default_subreddit.as_str());
    let identity = FeedIdentity::from_path(path)?;
    let session = ctx.session(identity);

    for _ in 0..pages.max(1) {
        match session.load_more().await {
            LoadOutcome::Applied { added, duplicates } => {
                tracing::debug!(added, duplicates, "page loaded");
            }
            LoadOutcome::Failed(err) => {
                println!("Failed to load more: {}", err);
                break;
            }
            LoadOutcome::Skipped | LoadOutcome::Stale => break,
        }
    }

    let snapshot = session.snapshot().await;
    println!("{} ({} posts)", snapshot.identity, snapshot.entries.len());

    let views = visible_entries(&snapshot.entries, ctx.store.as_ref(), &ctx.resolver);
    let media = join_all(views.iter().map(|view| settle(ctx, view))).await;

    for (view, media) in views.iter().zip(media) {
        let star = if view.favorite { "*" } else { " " };
        println!("{:>6} {} {}", view.entry.score, star, view.title);
        println!("         [{}] {}", media.label(), describe(&media));
    }

    match snapshot.state {
        FeedState::Exhausted => println!("End of feed"),
        FeedState::Errored(_) => println!("Loading stopped; run again to retry"),
        _ => println!("More available (--pages {})", pages.max(1) + 1),
    }

    Ok(())
}

/// Replace art-platform pages with their direct image. A failed lookup
/// leaves the entry as it was.
async fn settle(ctx: &AppContext, view: &EntryView<'_>) -> MediaDescriptor {
    match &view.media {
        MediaDescriptor::ExternalAsync { source_url, .. } => {
            match ctx.oembed.load(source_url, &view.title).await {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    tracing::warn!(url = %source_url, error = %err, "oembed lookup failed");
                    view.media.clone()
                }
            }
        }
        other => other.clone(),
    }
}

fn describe(media: &MediaDescriptor) -> String {
    match media {
        MediaDescriptor::Image { src, .. } | MediaDescriptor::AnimatedImage { src, .. } => {
            src.clone()
        }
        MediaDescriptor::Video { sources } => sources
            .iter()
            .map(|s| s.src.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
        MediaDescriptor::Collection { kind, id, .. } => {
            format!("{} {} (expand with `subscroll album`)", kind.as_str(), id)
        }
        MediaDescriptor::EmbeddedPlayer { embed_src, .. } => embed_src.clone(),
        MediaDescriptor::ExternalAsync { source_url, .. } => source_url.clone(),
        MediaDescriptor::Unresolved { .. } => media
            .failure_notice()
            .map(|notice| notice.to_string())
            .unwrap_or_default(),
    }
}

pub fn resolve(ctx: &AppContext, url: &str, title: &str) -> Result<()> {
    let (rule, descriptor) = ctx.resolver.resolve_with_rule(url, title);
    let json = serde_json::to_string_pretty(&descriptor)
        .map_err(|e| SubscrollError::Other(e.to_string()))?;

    println!("Rule: {:?}", rule);
    println!("{}", json);
    Ok(())
}

pub async fn album(ctx: &AppContext, url: &str, more: usize) -> Result<()> {
    let descriptor = ctx.resolver.resolve(url, "");
    let Some(mut expander) = ctx.expander(&descriptor) else {
        println!("Not an album or gallery: {}", url);
        return Ok(());
    };

    expander.expand(&ctx.manifests).await?;
    for _ in 0..more {
        expander.reveal_more();
    }
    let expansion = expander.expand(&ctx.manifests).await?;

    for item in &expansion.items {
        let media = item.resolve();
        println!("[{}] {}", media.label(), item.title.trim());
        println!("    {}", describe(&media));
    }

    if expansion.remaining() > 0 {
        println!("{} left (--more {})", expansion.remaining(), more + 1);
    }

    Ok(())
}

pub fn set_flag(ctx: &AppContext, url: &str, kind: FlagKind, value: bool) -> Result<()> {
    ctx.store.set(url, kind, value)?;
    let verb = if value { "Marked" } else { "Cleared" };
    println!("{} {}: {}", verb, kind.as_str(), url);
    Ok(())
}

pub fn favorite(
    ctx: &AppContext,
    url: &str,
    name: Option<String>,
    subreddit: Option<String>,
) -> Result<()> {
    if name.is_none() && subreddit.is_none() {
        return set_flag(ctx, url, FlagKind::Favorite, true);
    }

    let name = name.unwrap_or_default();
    let entry = Entry {
        id: name.trim_start_matches("t3_").to_string(),
        name,
        url: url.to_string(),
        title: String::new(),
        score: 0,
        domain: String::new(),
        subreddit: subreddit.unwrap_or_default(),
    };
    ctx.store.favorite_entry(&entry)?;
    println!("Marked favorite: {}", url);
    Ok(())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.store.favorites()?;

    if favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    for fav in favorites {
        let origin = match (&fav.subreddit, &fav.reddit_name) {
            (Some(sub), Some(name)) => format!("r/{} {}", sub, name),
            (Some(sub), None) => format!("r/{}", sub),
            (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        };
        println!("{}  {}  {}", fav.created_at.format("%Y-%m-%d %H:%M"), fav.url, origin);
    }

    Ok(())
}

pub fn show_flags(ctx: &AppContext, url: &str) -> Result<()> {
    for flag in ctx.store.flags(url)? {
        println!("{:<9} {}", flag.flag_kind.as_str(), flag.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::domain::{CollectionKind, VideoSource};
    use crate::fetcher::mock::MockFetcher;
    use crate::store::SqliteOverlayStore;

    fn context(fetcher: MockFetcher) -> AppContext {
        let store = Arc::new(SqliteOverlayStore::in_memory().unwrap());
        AppContext::with_parts(Config::default(), store, Arc::new(fetcher)).unwrap()
    }

    #[test]
    fn test_describe_variants() {
        let video = MediaDescriptor::Video {
            sources: vec![
                VideoSource::new("https://a/1.webm", Some("video/webm")),
                VideoSource::new("https://a/1.mp4", Some("video/mp4")),
            ],
        };
        assert_eq!(describe(&video), "https://a/1.webm | https://a/1.mp4");

        let album = MediaDescriptor::Collection {
            kind: CollectionKind::Album,
            id: "x".into(),
            item_title_prefix: "T".into(),
        };
        assert!(describe(&album).starts_with("album x"));

        let miss = MediaDescriptor::Unresolved {
            original_url: "https://unknown.example/page".into(),
        };
        assert_eq!(describe(&miss), "No match found for https://unknown.example/page");
    }

    #[tokio::test]
    async fn test_settle_loads_art_pages() {
        let ctx = context(MockFetcher::new().route(
            "https://backend.deviantart.com/oembed",
            r#"{"url": "https://images.example/art.jpg"}"#,
        ));
        let entry = Entry {
            id: "d1".into(),
            name: "t3_d1".into(),
            url: "http://fav.me/d2enxz7".into(),
            title: "Art".into(),
            score: 3,
            domain: "fav.me".into(),
            subreddit: "art".into(),
        };
        let entries = vec![entry];
        let views = visible_entries(&entries, ctx.store.as_ref(), &ctx.resolver);

        let media = settle(&ctx, &views[0]).await;
        assert_eq!(
            media,
            MediaDescriptor::Image {
                src: "https://images.example/art.jpg".into(),
                alt: "Art".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_settle_keeps_descriptor_on_failure() {
        let ctx = context(MockFetcher::new());
        let entries = vec![Entry {
            id: "d1".into(),
            name: String::new(),
            url: "http://fav.me/d2enxz7".into(),
            title: "Art".into(),
            score: 0,
            domain: String::new(),
            subreddit: String::new(),
        }];
        let views = visible_entries(&entries, ctx.store.as_ref(), &ctx.resolver);

        let media = settle(&ctx, &views[0]).await;
        assert!(matches!(media, MediaDescriptor::ExternalAsync { .. }));
    }

    #[test]
    fn test_favorite_with_origin() {
        let ctx = context(MockFetcher::new());
        let url = "https://i.imgur.com/x.jpg";
        favorite(&ctx, url, Some("t3_x".into()), Some("aww".into())).unwrap();

        let favorites = ctx.store.favorites().unwrap();
        assert_eq!(favorites[0].reddit_name.as_deref(), Some("t3_x"));
        assert_eq!(favorites[0].subreddit.as_deref(), Some("aww"));
    }

    #[tokio::test]
    async fn test_browse_rejects_bad_period() {
        let ctx = context(MockFetcher::new());
        let err = browse(&ctx, Some("mapporn/top/fortnight"), 1).await.unwrap_err();
        assert_eq!(err.to_string(), "You entered 'fortnight' as period, which is invalid");
    }
}
