//! Nexus - terminal chat front-end for Gemini
//!
#![doc = "Main entry point for the Nexus chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nexus::cli::{Cli, Commands};
use nexus::commands;
use nexus::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Pick up GEMINI_API_KEY and friends from a local .env file
    if dotenvy::dotenv().is_ok() {
        tracing::debug!("Loaded environment from .env");
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let mut config = Config::load(config_path, &cli)?;

    match cli.command {
        Commands::Chat { model, resume } => {
            if let Some(m) = model {
                tracing::debug!("Using model override: {}", m);
                config.provider.model = m;
            }
            config.validate()?;

            if let Some(r) = &resume {
                tracing::debug!("Resuming chat: {}", r);
            }

            commands::chat::run_chat(config, resume).await?;
            Ok(())
        }
        Commands::Ask { prompt, model } => {
            if let Some(m) = model {
                tracing::debug!("Using model override: {}", m);
                config.provider.model = m;
            }
            config.validate()?;

            commands::ask::run_ask(config, prompt).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so chat output on stdout stays readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "nexus=debug" } else { "nexus=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
