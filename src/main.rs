//! Shikshak Saathi - bilingual teaching coach
//!
#![doc = "Main entry point for the saathi server and offline client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shikshak_saathi::cli::{Cli, Commands};
use shikshak_saathi::commands;
use shikshak_saathi::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Initialize tracing
    init_tracing(cli.verbose, config.logging.json);
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting coaching API server");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Ask {
            query,
            offline,
            chat,
            new,
            ..
        } => {
            tracing::info!("Starting ask command");
            if offline {
                tracing::debug!("Offline mode forced");
            }
            commands::ask::run_ask(config, query, offline, chat, new).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
        Commands::Pending { command } => {
            tracing::info!("Starting pending command");
            commands::pending::handle_pending(&config, command).await?;
            Ok(())
        }
        Commands::Cache { command } => {
            tracing::info!("Starting cache command");
            commands::cache::handle_cache(&config, command)?;
            Ok(())
        }
        Commands::Settings { command } => {
            tracing::info!("Starting settings command");
            commands::settings::handle_settings(&config, command)?;
            Ok(())
        }
        Commands::Shell { command } => {
            tracing::info!("Starting shell command");
            commands::shell::handle_shell(&config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "shikshak_saathi=debug"
    } else {
        "shikshak_saathi=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
