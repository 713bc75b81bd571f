pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "subscroll")]
#[command(about = "Browse subreddit media feeds from the terminal", long_about = None)]
pub struct Cli {
    /// Overlay database path (default: <data dir>/subscroll/subscroll.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the media of a feed, e.g. `mapporn`, `mapporn/top/week`
    Browse {
        /// Feed path; defaults to the configured subreddit
        path: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show what a URL resolves to
    Resolve {
        url: String,

        /// Title used as alt text
        #[arg(short, long, default_value = "")]
        title: String,
    },
    /// Expand an Imgur album or gallery
    Album {
        url: String,

        /// Extra "load more" steps after the first reveal
        #[arg(short, long, default_value_t = 0)]
        more: usize,
    },
    /// Hide a post by its media URL
    Hide { url: String },
    /// Show a hidden post again
    Unhide { url: String },
    /// Mark a media URL as favorite
    Favorite {
        url: String,

        /// Fullname of the post, e.g. t3_862uxs
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        subreddit: Option<String>,
    },
    /// Remove a favorite
    Unfavorite { url: String },
    /// List favorites, newest first
    Favorites,
    /// Show the overlay flags of a URL
    Flags { url: String },
}
