//! Spotter CLI entry point.

use anyhow::Result;
use clap::Parser;
use spotter::cli::{commands, Cli, Commands};
use spotter::config::{Secrets, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(&config_path))?;

    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("spotter={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let secrets = Secrets::from_env();
    tracing::debug!("Loaded {:?}", secrets);

    match &cli.command {
        Commands::Ask { question, top_k } => {
            commands::run_ask(question, *top_k, settings, secrets).await?;
        }

        Commands::Chat => {
            commands::run_chat(settings, secrets).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(query, *limit, settings, secrets).await?;
        }

        Commands::Ingest { input_dir, output } => {
            commands::run_ingest(input_dir, output.clone(), &settings)?;
        }

        Commands::Index { input } => {
            commands::run_index(input.clone(), settings, secrets).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &secrets, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, &config_path)?;
        }
    }

    Ok(())
}
