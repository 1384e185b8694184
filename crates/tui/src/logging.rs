use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Sends tracing output to the configured log file; stdout belongs to the
/// terminal UI.
pub fn init(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .with_writer(file)
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!(
        "expenses_tui={level},insights={level}",
        level = level
    ))
}
