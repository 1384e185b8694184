use std::time::Duration;

use clap::{Parser, ValueEnum};
use insights::{ColorMode, DEFAULT_CATEGORIES};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/expenses.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub expenses_path: String,
    /// Named options of the category selector (`All` is always first).
    pub categories: Vec<String>,
    pub colors: ColorMode,
    /// Seed for `colors = "random"`; drawn from entropy when unset.
    pub seed: Option<u64>,
    pub log_file: String,
    pub log_level: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            expenses_path: "expenses".to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            colors: ColorMode::Hashed,
            seed: None,
            log_file: "expenses_tui.log".to_string(),
            log_level: "info".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    Hashed,
    Random,
}

impl From<ColorArg> for ColorMode {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Hashed => ColorMode::Hashed,
            ColorArg::Random => ColorMode::Random,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "expenses_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the expenses endpoint path.
    #[arg(long)]
    expenses_path: Option<String>,
    /// Category colors: stable per name, or random on every recomputation.
    #[arg(long, value_enum)]
    colors: Option<ColorArg>,
    /// Seed for random colors.
    #[arg(long)]
    seed: Option<u64>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("EXPENSES_TUI")
            .list_separator(",")
            .with_list_parse_key("categories")
            .try_parsing(true),
    );
    let settings: AppConfig = builder.build()?.try_deserialize()?;

    Ok(apply_args(settings, args))
}

fn apply_args(mut settings: AppConfig, args: Args) -> AppConfig {
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(path) = args.expenses_path {
        settings.expenses_path = path;
    }
    if let Some(colors) = args.colors {
        settings.colors = colors.into();
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings
}
