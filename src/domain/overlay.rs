use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    Hidden,
    Favorite,
}

impl FlagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::Hidden => "hidden",
            FlagKind::Favorite => "favorite",
        }
    }
}

/// Local-only mark on a URL. Absence in the store means `value == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayFlag {
    pub url: String,
    pub flag_kind: FlagKind,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub url: String,
    pub reddit_name: Option<String>,
    pub subreddit: Option<String>,
    pub created_at: DateTime<Utc>,
}
