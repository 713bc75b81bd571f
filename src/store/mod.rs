pub mod sqlite;

use crate::app::Result;
use crate::domain::{Entry, FavoriteRecord, FlagKind, OverlayFlag};

pub use sqlite::SqliteOverlayStore;

/// Local-only hidden/favorite marks, keyed by URL.
///
/// Nothing here knows about feeds. Keys may name posts no feed holds any
/// more, and resetting a feed never touches the store.
pub trait OverlayStore {
    fn get(&self, url: &str, kind: FlagKind) -> Result<bool>;
    /// `false` removes the mark.
    fn set(&self, url: &str, kind: FlagKind, value: bool) -> Result<()>;

    /// Favorite `entry.url`, remembering where it came from.
    fn favorite_entry(&self, entry: &Entry) -> Result<()>;
    /// Newest first.
    fn favorites(&self) -> Result<Vec<FavoriteRecord>>;
    fn hidden_urls(&self) -> Result<Vec<String>>;

    fn flags(&self, url: &str) -> Result<Vec<OverlayFlag>> {
        [FlagKind::Hidden, FlagKind::Favorite]
            .into_iter()
            .map(|kind| {
                Ok(OverlayFlag {
                    url: url.to_string(),
                    flag_kind: kind,
                    value: self.get(url, kind)?,
                })
            })
            .collect()
    }
}
