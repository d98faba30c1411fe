use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flagfetch::app::AppContext;
use flagfetch::cli::{commands, Cli, Commands};
use flagfetch::config::Config;
use flagfetch::domain::DataKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_uri) = cli.base_uri {
        config.base_uri = base_uri;
    }
    if let Some(sdk_key) = cli.sdk_key {
        config.sdk_key = sdk_key;
    }
    if let Commands::Poll {
        interval: Some(interval),
        ..
    } = &cli.command
    {
        config.poll_interval = interval.clone();
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::All => {
            commands::fetch_all(&ctx).await?;
        }
        Commands::Flag { key } => {
            commands::fetch_object(&ctx, DataKind::Features, &key).await?;
        }
        Commands::Segment { key } => {
            commands::fetch_object(&ctx, DataKind::Segments, &key).await?;
        }
        Commands::Poll { count, .. } => {
            commands::poll(&ctx, count).await?;
        }
    }

    Ok(())
}
