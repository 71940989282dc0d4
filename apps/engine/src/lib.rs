//! Spaced-repetition practice engine.
//!
//! Wraps the pure scheduling and selection rules from `practice-core` with
//! storage, a clock and per-pair write serialization.

pub mod cli;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

use std::fs;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use db::{MemoryRepository, PracticeRepository, SqliteRepository};
pub use error::{EngineError, Result};
pub use services::{AnswerOutcome, DifficultyDecision, LearnerStats, PracticeEngine};

use crate::cli::Cli;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    if let Some(parent) = config.database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::debug!(path = %config.database_path.display(), "Opening database");
    let repo = SqliteRepository::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    let engine = PracticeEngine::from_config(repo, &config);
    cli::execute(&engine, cli.command)
}
