//! spotify-mcp CLI entry point.

use anyhow::Result;
use clap::Parser;
use spotify_mcp::cli::{commands, Cli, Commands};
use spotify_mcp::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging. stdout carries the protocol, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("spotify_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve => {
            commands::run_serve(&cli.identity, &settings).await?;
        }

        Commands::Tools => {
            commands::run_tools()?;
        }

        Commands::Call { tool, args } => {
            commands::run_call(tool, args.as_deref(), &cli.identity, &settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&cli.identity, &settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, &config_path)?;
        }
    }

    Ok(())
}
