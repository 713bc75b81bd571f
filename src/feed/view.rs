use crate::domain::{Entry, FlagKind, MediaDescriptor};
use crate::resolver::Resolver;
use crate::store::OverlayStore;

/// An entry as the view shows it: decoded title, media, favorite mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<'a> {
    pub entry: &'a Entry,
    pub title: String,
    pub favorite: bool,
    pub media: MediaDescriptor,
}

/// Everything in `entries` that is not hidden, in feed order.
///
/// The overlay is only read. A store error for one entry is logged and the
/// entry is shown unmarked; it never drops its siblings.
pub fn visible_entries<'a, S>(
    entries: &'a [Entry],
    store: &S,
    resolver: &Resolver,
) -> Vec<EntryView<'a>>
where
    S: OverlayStore + ?Sized,
{
    entries
        .iter()
        .filter(|entry| !read_flag(store, entry, FlagKind::Hidden))
        .map(|entry| {
            let title = entry.display_title();
            EntryView {
                entry,
                favorite: read_flag(store, entry, FlagKind::Favorite),
                media: resolver.resolve(&entry.url, &title),
                title,
            }
        })
        .collect()
}

fn read_flag<S: OverlayStore + ?Sized>(store: &S, entry: &Entry, kind: FlagKind) -> bool {
    store.get(&entry.url, kind).unwrap_or_else(|err| {
        tracing::warn!(url = %entry.url, kind = kind.as_str(), error = %err, "overlay read failed");
        false
    })
}
