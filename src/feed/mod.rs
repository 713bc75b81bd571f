//! The incremental feed: accumulation state machine, its async driver, and
//! the overlay-aware view of the accumulated entries.

pub mod accumulator;
pub mod session;
pub mod view;

pub use accumulator::{FeedAccumulator, FeedEvent, FeedState, LoadOutcome, PageTicket};
pub use session::{FeedSession, FeedSnapshot};
pub use view::{visible_entries, EntryView};
