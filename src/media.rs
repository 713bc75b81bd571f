//! Render-time helpers for resolved media.
//!
//! Nothing here touches the feed: a media failure is reported for one entry
//! and the entry stays in place with a placeholder.

use thiserror::Error;

use crate::domain::{MediaDescriptor, VideoSource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaLoadError {
    #[error("Image '{alt}' failed to load")]
    Image { alt: String, src: String },

    #[error("Video failed to load")]
    Video { tried: Vec<String> },

    #[error("Embedded player failed to load")]
    Player { src: String },

    #[error("No match found for {url}")]
    Unresolved { url: String },
}

impl MediaLoadError {
    /// Technical URLs to show under the message.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            MediaLoadError::Image { src, .. } => vec![src.as_str()],
            MediaLoadError::Video { tried } => tried.iter().map(String::as_str).collect(),
            MediaLoadError::Player { src } => vec![src.as_str()],
            MediaLoadError::Unresolved { url } => vec![url.as_str()],
        }
    }
}

impl MediaDescriptor {
    /// The placeholder shown when this descriptor cannot be displayed.
    ///
    /// Collections and external loaders have nothing of their own to fail;
    /// their failures come from the expander or the loader instead.
    pub fn failure_notice(&self) -> Option<MediaLoadError> {
        match self {
            MediaDescriptor::Image { src, alt } | MediaDescriptor::AnimatedImage { src, alt } => {
                Some(MediaLoadError::Image {
                    alt: alt.clone(),
                    src: src.clone(),
                })
            }
            MediaDescriptor::Video { sources } => Some(MediaLoadError::Video {
                tried: sources.iter().map(|s| s.src.clone()).collect(),
            }),
            MediaDescriptor::EmbeddedPlayer { embed_src, .. } => Some(MediaLoadError::Player {
                src: embed_src.clone(),
            }),
            MediaDescriptor::Unresolved { original_url } => Some(MediaLoadError::Unresolved {
                url: original_url.clone(),
            }),
            MediaDescriptor::Collection { .. } | MediaDescriptor::ExternalAsync { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Trying(usize),
    Playing(usize),
    Failed,
}

/// Walks a video's sources in priority order. A successful load is
/// terminal; later errors are ignored.
#[derive(Debug, Clone)]
pub struct SourceAttempts {
    sources: Vec<VideoSource>,
    state: PlaybackState,
}

impl SourceAttempts {
    pub fn new(sources: Vec<VideoSource>) -> Self {
        let state = if sources.is_empty() {
            PlaybackState::Failed
        } else {
            PlaybackState::Trying(0)
        };
        Self { sources, state }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current(&self) -> Option<&VideoSource> {
        match self.state {
            PlaybackState::Trying(i) | PlaybackState::Playing(i) => self.sources.get(i),
            PlaybackState::Failed => None,
        }
    }

    pub fn on_loaded(&mut self) {
        if let PlaybackState::Trying(i) = self.state {
            self.state = PlaybackState::Playing(i);
        }
    }

    /// Advance past a failed source. Returns the next one to try, or the
    /// load error once every source has failed.
    pub fn on_error(&mut self) -> Result<Option<&VideoSource>, MediaLoadError> {
        match self.state {
            PlaybackState::Playing(_) => Ok(None),
            PlaybackState::Trying(i) if i + 1 < self.sources.len() => {
                self.state = PlaybackState::Trying(i + 1);
                tracing::debug!(
                    next = %self.sources[i + 1].src,
                    "video source failed, trying next"
                );
                Ok(self.sources.get(i + 1))
            }
            PlaybackState::Trying(_) | PlaybackState::Failed => {
                self.state = PlaybackState::Failed;
                Err(MediaLoadError::Video {
                    tried: self.sources.iter().map(|s| s.src.clone()).collect(),
                })
            }
        }
    }
}
