pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::rates::OutputFormat;
use crate::core::Currency;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Fetch rates for `currencies`, or for the configured list when empty.
    Rates {
        currencies: Vec<Currency>,
        format: OutputFormat,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("cnb-rates starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Rates { currencies, format } => {
            let currencies = if currencies.is_empty() {
                config.currencies.clone()
            } else {
                currencies
            };
            cli::rates::run(&config, &currencies, format).await
        }
    }
}
