//! Configuration for subscroll.
//!
//! Configuration is read from `~/.config/subscroll/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod sections;

pub use sections::{ApiConfig, FeedConfig, GalleryConfig};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub gallery: GalleryConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/subscroll/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("subscroll").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!(path = %path.display(), "wrote default config");
        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# subscroll configuration
#
# Every key is optional; anything left out uses the value shown here.

[api]
# Where listings are fetched from
listing_base = "https://www.reddit.com/"

# Imgur API used to expand albums and galleries
imgur_api_base = "https://api.imgur.com/3/"
imgur_client_id = "a2657fbb95b9063"

# oEmbed endpoint that turns DeviantArt pages into direct images
oembed_endpoint = "https://backend.deviantart.com/oembed"

user_agent = "subscroll/0.1.0"

# Request timeout in seconds
timeout_secs = 10

[feed]
# Subreddit opened by `subscroll browse` without an argument
default_subreddit = "mapporn"

# Load the next page when the view is this many pixels from the bottom
scroll_threshold = 2000.0

# At most one scroll-triggered load per interval (milliseconds)
trigger_interval_ms = 2000

[gallery]
# Album and gallery children shown at first, and per "load more"
initial_reveal = 5
reveal_step = 5

# Horizontal distance from the end of the strip that reveals more
scroll_threshold = 500.0
trigger_interval_ms = 1000
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
