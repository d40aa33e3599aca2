// src/main.rs

mod assistant;
mod cli;
mod config;
mod error;
mod filter;
mod intent;
mod llm;
mod news;
mod prompt;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use reqwest::Client;
use tracing::{error, info};

#[tokio::main]
async fn main() -> error::Result<()> {
    // --- Load .env file ---
    // Place this early, before loading config which reads env vars
    dotenvy::dotenv().ok(); // Ignore error if .env is not found

    #[cfg(feature = "logging")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    info!("Starting news chat...");

    let config = config::Config::load().context("Failed to load configuration")?;

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let service = llm::build_service(&config, &client);
    let mut assistant = assistant::Assistant::from_config(&config, service);

    if let Err(e) = cli::repl::run_interactive(&mut assistant).await {
        error!("Application error: {:?}", e);
        eprintln!("\n[ОШИБКА] Критическая ошибка: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
