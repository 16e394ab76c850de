//! Ingestion pipeline for Indonesian legal regulations: discovery, PDF
//! extraction, structural parsing, and loading into a searchable store.

mod cli;
mod config;
mod migrations;
mod models;
mod ocr;
mod parser;
mod repository;
mod schema;
mod scrapers;
mod services;
mod storage;
mod supervisor;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "worker=info"
    } else {
        "worker=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
