use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Best,
    Hot,
    New,
    Top,
    Controversial,
}

impl Sort {
    pub const ALL: [Sort; 5] = [
        Sort::Best,
        Sort::Hot,
        Sort::New,
        Sort::Top,
        Sort::Controversial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Best => "best",
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
            Sort::Controversial => "controversial",
        }
    }

    /// Path segment in front of `.json`. The default ranking has none.
    pub fn path_segment(self) -> &'static str {
        match self {
            Sort::Best => "",
            other => other.as_str(),
        }
    }

    /// Whether a time window narrows this sort.
    pub fn takes_window(self) -> bool {
        matches!(self, Sort::Top | Sort::Controversial)
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Sort::Best);
        }
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ValidationError::Sort(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 6] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }

    /// Parse a period. The empty string means "no window"; anything
    /// unrecognized is rejected rather than coerced.
    pub fn parse(value: &str) -> Result<Option<Self>, ValidationError> {
        if value.is_empty() {
            return Ok(None);
        }
        Self::ALL
            .into_iter()
            .find(|window| window.as_str() == value)
            .map(Some)
            .ok_or_else(|| ValidationError::Period(value.to_string()))
    }
}

/// Which feed is being accumulated. Two identities that compare equal
/// share one feed; any difference forces a reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedIdentity {
    pub collection_name: String,
    pub sort: Sort,
    pub time_window: Option<TimeWindow>,
}

impl FeedIdentity {
    /// Build an identity from user-supplied parts.
    ///
    /// The collection name is stripped to `[A-Za-z0-9_-]`. `top` and
    /// `controversial` default to the `all` window; other sorts drop the
    /// window after validating it.
    pub fn new(
        collection_name: &str,
        sort: Sort,
        window: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let collection_name = sanitize_name(collection_name);
        if collection_name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let window = match window {
            Some(value) => TimeWindow::parse(value)?,
            None => None,
        };

        let time_window = if sort.takes_window() {
            Some(window.unwrap_or(TimeWindow::All))
        } else {
            None
        };

        Ok(Self {
            collection_name,
            sort,
            time_window,
        })
    }

    /// Parse a route shaped like `mapporn`, `r/mapporn/hot` or
    /// `mapporn/top/week`.
    pub fn from_path(path: &str) -> Result<Self, ValidationError> {
        let trimmed = path.trim().trim_matches('/');
        let trimmed = trimmed.strip_prefix("r/").unwrap_or(trimmed);
        let mut parts = trimmed.split('/');

        let name = parts.next().unwrap_or_default();
        let sort = Sort::parse(parts.next().unwrap_or_default())?;
        let window = parts.next();

        Self::new(name, sort, window)
    }

    /// Path of the listing document relative to the listing base.
    pub fn listing_path(&self) -> String {
        format!("r/{}/{}.json", self.collection_name, self.sort.path_segment())
    }

    pub fn window_param(&self) -> &'static str {
        self.time_window.map(TimeWindow::as_str).unwrap_or("")
    }
}

impl fmt::Display for FeedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{}", self.collection_name)?;
        if self.sort != Sort::Best {
            write!(f, "/{}", self.sort.as_str())?;
        }
        if let Some(window) = self.time_window {
            write!(f, "/{}", window.as_str())?;
        }
        Ok(())
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
