use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subscroll::app::AppContext;
use subscroll::cli::{commands, Cli, Commands};
use subscroll::config::Config;
use subscroll::domain::FlagKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(cli.db, config)?;

    match cli.command {
        Commands::Browse { path, pages } => {
            commands::browse(&ctx, path.as_deref(), pages).await?;
        }
        Commands::Resolve { url, title } => {
            commands::resolve(&ctx, &url, &title)?;
        }
        Commands::Album { url, more } => {
            commands::album(&ctx, &url, more).await?;
        }
        Commands::Hide { url } => {
            commands::set_flag(&ctx, &url, FlagKind::Hidden, true)?;
        }
        Commands::Unhide { url } => {
            commands::set_flag(&ctx, &url, FlagKind::Hidden, false)?;
        }
        Commands::Favorite { url, name, subreddit } => {
            commands::favorite(&ctx, &url, name, subreddit)?;
        }
        Commands::Unfavorite { url } => {
            commands::set_flag(&ctx, &url, FlagKind::Favorite, false)?;
        }
        Commands::Favorites => {
            commands::list_favorites(&ctx)?;
        }
        Commands::Flags { url } => {
            commands::show_flags(&ctx, &url)?;
        }
    }

    Ok(())
}
