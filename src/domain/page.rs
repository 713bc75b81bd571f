use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Entry;

/// Opaque pagination token. Empty means "start of feed" when sent and
/// "no more pages" when received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn start() -> Self {
        Self(String::new())
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<Option<String>> for Cursor {
    fn from(token: Option<String>) -> Self {
        Self(token.unwrap_or_default())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<start>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// One fetched page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<Entry>,
    pub next_cursor: Cursor,
}
