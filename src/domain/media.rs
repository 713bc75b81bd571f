use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub src: String,
    /// `None` leaves the type for the player to sniff.
    pub mime_type: Option<String>,
}

impl VideoSource {
    pub fn new(src: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Album,
    Gallery,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Gallery => "gallery",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "album" => Some(CollectionKind::Album),
            "gallery" => Some(CollectionKind::Gallery),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerProvider {
    Youtube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Deviantart,
}

/// Renderable classification of an entry URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaDescriptor {
    Image {
        src: String,
        alt: String,
    },
    AnimatedImage {
        src: String,
        alt: String,
    },
    /// Sources are attempted in order; the first that loads wins.
    Video {
        sources: Vec<VideoSource>,
    },
    /// Needs a manifest fetch before it has anything to show.
    Collection {
        kind: CollectionKind,
        id: String,
        item_title_prefix: String,
    },
    EmbeddedPlayer {
        provider: PlayerProvider,
        embed_src: String,
    },
    ExternalAsync {
        loader_kind: LoaderKind,
        source_url: String,
    },
    Unresolved {
        original_url: String,
    },
}

impl MediaDescriptor {
    pub fn label(&self) -> &'static str {
        match self {
            MediaDescriptor::Image { .. } => "image",
            MediaDescriptor::AnimatedImage { .. } => "animated image",
            MediaDescriptor::Video { .. } => "video",
            MediaDescriptor::Collection { kind, .. } => match kind {
                CollectionKind::Album => "album",
                CollectionKind::Gallery => "gallery",
            },
            MediaDescriptor::EmbeddedPlayer { .. } => "embedded player",
            MediaDescriptor::ExternalAsync { .. } => "external",
            MediaDescriptor::Unresolved { .. } => "unresolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, MediaDescriptor::Unresolved { .. })
    }
}
