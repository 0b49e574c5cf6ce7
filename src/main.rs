// Casebook runner: seeds the knowledge base, adds customer feedback, generates
// AI/ML use cases and prints them. All tuning lives in the TOML config.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use casebook::document::tagged;
use casebook::embeddings::{TextEncoder, load_encoder};
use casebook::{
    CasebookConfig, DocumentLog, FlatIndex, HttpChatBackend, RagAgent, RagSettings, SeedContext,
};

const INDUSTRY_DATA: &str = "
    The technology industry is seeing rapid advancements in AI, automation, and machine learning.
    Key trends include:
    - Natural Language Processing improvements
    - Computer Vision applications
    - Predictive Analytics
    - Automated Customer Service
    ";

const COMPANY_DATA: &str = "
    Apple Inc. is using AI to enhance its products and services:
    - Siri virtual assistant
    - Photos app with object recognition
    - Predictive text and autocorrect
    - App Store recommendations
    ";

const CUSTOMER_FEEDBACK: &str = "
        Recent customer feedback indicates:
        - Users want more personalized experiences
        - Faster response times needed
        - Better product recommendations requested
        - Technical support improvements needed
        ";

/// Console plus daily rolling file output; the guards must outlive `main`
fn init_logging(logs_dir: &Path) -> (WorkerGuard, WorkerGuard) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("casebook=info"));

    fs::create_dir_all(logs_dir).unwrap_or_else(|e| {
        eprintln!("Failed to create logs directory: {}", e);
    });

    let file_appender = rolling::daily(logs_dir, "casebook.log");
    let (non_blocking_file, file_guard) = non_blocking(file_appender);
    let (non_blocking_console, console_guard) = non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking_console)
                .with_target(false)
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    (file_guard, console_guard)
}

fn main() -> Result<()> {
    let config_path =
        std::env::var("CASEBOOK_CONFIG").unwrap_or_else(|_| "casebook.toml".to_string());
    let config = CasebookConfig::load(&config_path)?;

    let _guards = init_logging(&config.log_dir);
    info!("🚀 Starting Casebook");

    let api_key = std::env::var(&config.generation.api_key_env).with_context(|| {
        format!(
            "{} not found in environment variables",
            config.generation.api_key_env
        )
    })?;

    let encoder: Arc<dyn TextEncoder> = Arc::new(load_encoder(&config.embedding)?);
    let log = DocumentLog::open(&config.store_path)?;
    let index = FlatIndex::new(encoder);
    let backend = HttpChatBackend::new(&config.generation, api_key)?;

    let mut agent = RagAgent::new(
        SeedContext::new(INDUSTRY_DATA, COMPANY_DATA),
        log,
        Box::new(index),
        Box::new(backend),
        RagSettings::from_config(&config),
    )?;

    agent.add_knowledge(CUSTOMER_FEEDBACK, tagged("customer_feedback"))?;

    match agent.generate() {
        Ok(use_cases) => {
            println!("\nGenerated Use Cases:");
            println!("{}", "-".repeat(50));
            println!("{}", use_cases);
            Ok(())
        }
        Err(e) => {
            error!("Failed to generate use cases: {}", e);
            Err(e.into())
        }
    }
}
