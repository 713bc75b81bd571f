//! # subscroll
//!
//! Media feed engine for subreddit listings.
//!
//! ## Architecture
//!
//! ```text
//! ListingClient → FeedAccumulator → Resolver → CollectionExpander
//!                                      ↑
//!                               OverlayStore (hidden / favorite)
//! ```
//!
//! - [`fetcher`]: listing, manifest and oEmbed clients over one HTTP seam
//! - [`feed`]: append-only, de-duplicated pagination with stale-result suppression
//! - [`resolver`]: ordered URL rules producing a [`MediaDescriptor`](domain::MediaDescriptor)
//! - [`store`]: local SQLite overlay, never sent anywhere
//!
//! ## Quick Start
//!
//! ```bash
//! # First page of a feed
//! subscroll browse mapporn/top/week
//!
//! # What a link turns into
//! subscroll resolve https://v.redd.it/xyz
//!
//! # Expand an album
//! subscroll album https://imgur.com/a/abc123 --more 1
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the overlay
/// store, the HTTP fetcher, the API clients and the resolver.
pub mod app;

/// Command-line interface using clap.
///
/// - `browse [path]` - List a feed's media
/// - `resolve <url>` - Classify one URL
/// - `album <url>` - Expand an album or gallery
/// - `hide`/`unhide`, `favorite`/`unfavorite`, `favorites`, `flags`
pub mod cli;

/// Configuration loaded from `~/.config/subscroll/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`FeedIdentity`](domain::FeedIdentity): subreddit, sort and time window
/// - [`Entry`](domain::Entry): one post of a listing
/// - [`MediaDescriptor`](domain::MediaDescriptor): what a post's URL renders as
/// - [`OverlayFlag`](domain::OverlayFlag): local hidden/favorite marks
pub mod domain;

/// Lazy album and gallery expansion.
pub mod expander;

/// Feed accumulation and its async driver.
pub mod feed;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for raw JSON GETs
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ListingClient`](fetcher::ListingClient): paginated listings
pub mod fetcher;

/// Render-time media helpers: video fallback and failure placeholders.
pub mod media;

/// URL to media classification.
pub mod resolver;

/// Scroll proximity and trigger throttling.
pub mod scroll;

/// SQLite overlay persistence.
///
/// - [`OverlayStore`](store::OverlayStore): Trait defining overlay operations
/// - [`SqliteOverlayStore`](store::SqliteOverlayStore): SQLite implementation
pub mod store;
