use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cnb_rates::cli::rates::OutputFormat;
use cnb_rates::core::Currency;
use cnb_rates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch the latest CNB exchange rates
    Rates {
        /// Currency codes to fetch, defaults to the configured list
        currencies: Vec<Currency>,

        /// Print rates as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cnb_rates::cli::setup::setup(),
        Some(Commands::Rates { currencies, json }) => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            };
            let command = cnb_rates::AppCommand::Rates { currencies, format };
            cnb_rates::run_command(command, cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
