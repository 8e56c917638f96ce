//! Auditorium CLI entry point.

use anyhow::Result;
use auditorium::cli::{commands, Cli, Commands};
use auditorium::config::Settings;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("auditorium={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Rooms => {
            commands::run_rooms(&settings).await?;
        }

        Commands::Seed { count, reset } => {
            commands::run_seed(count, reset, &settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, config_path.as_ref())?;
        }
    }

    Ok(())
}
