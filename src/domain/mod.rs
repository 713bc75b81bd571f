pub mod entry;
pub mod identity;
pub mod media;
pub mod overlay;
pub mod page;

pub use entry::Entry;
pub use identity::{FeedIdentity, Sort, TimeWindow};
pub use media::{CollectionKind, LoaderKind, MediaDescriptor, PlayerProvider, VideoSource};
pub use overlay::{FavoriteRecord, FlagKind, OverlayFlag};
pub use page::{Cursor, Page};
