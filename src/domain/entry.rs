use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

/// One post of a listing, as the remote source returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    /// Fullname such as `t3_862uxs`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// HTML-entity escaped at the source.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub subreddit: String,
}

impl Entry {
    pub fn display_title(&self) -> String {
        decode_html_entities(&self.title).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> Entry {
        Entry {
            id: "abc".into(),
            name: "t3_abc".into(),
            url: "https://example.com".into(),
            title: title.into(),
            score: 1,
            domain: "example.com".into(),
            subreddit: "aww".into(),
        }
    }

    #[test]
    fn test_display_title_unescapes() {
        assert_eq!(
            entry("Cats &amp; dogs &lt;3 &quot;friends&quot;").display_title(),
            "Cats & dogs <3 \"friends\""
        );
    }

    #[test]
    fn test_display_title_plain() {
        assert_eq!(entry("Plain title").display_title(), "Plain title");
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let entry: Entry = serde_json::from_str(r#"{"id": "x1", "url": "https://a.b"}"#).unwrap();
        assert_eq!(entry.id, "x1");
        assert_eq!(entry.score, 0);
        assert!(entry.title.is_empty());
    }
}
