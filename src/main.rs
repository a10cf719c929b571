//! Maguai - terminal chat client for a catalog of AI personas
//!
#![doc = "Main entry point for the Maguai chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maguai::cli::{Cli, Commands, ModelCommand};
use maguai::commands;
use maguai::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { model, thinking } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            if thinking {
                tracing::debug!("Thinking mode enabled from CLI");
            }

            // CLI overrides are already folded into `config`
            commands::run_chat(config).await?;
            Ok(())
        }
        Commands::Models { command } => match command {
            ModelCommand::List { filter, json } => {
                commands::models::list_models(filter.as_deref(), json)?;
                Ok(())
            }
            ModelCommand::Info { model, json } => {
                commands::models::show_model_info(&model, json)?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with chat output or JSON
/// listings on stdout. `MAGUAI_LOG_JSON=true` switches to JSON lines.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "maguai=debug" } else { "maguai=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json = std::env::var("MAGUAI_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);

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
