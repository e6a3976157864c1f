use super::ui;
use crate::core::config::AppConfig;
use crate::core::{Currency, ExchangeRate, ExchangeRateProvider, RateFailure, RecordingReporter};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn render_table(rates: &[ExchangeRate], failures: &[RateFailure]) -> String {
    let mut output = ui::style_text(
        &format!("Successfully retrieved {} exchange rates:", rates.len()),
        ui::StyleType::Title,
    );

    if !rates.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Source"),
            ui::header_cell("Target"),
            ui::header_cell("Rate"),
        ]);
        for rate in rates {
            table.add_row(vec![
                Cell::new(rate.source_currency()),
                Cell::new(rate.target_currency()),
                ui::number_cell(rate.value()),
            ]);
        }
        output.push_str("\n\n");
        output.push_str(&table.to_string());
    }

    if !failures.is_empty() {
        output.push_str("\n\n");
        output.push_str(&ui::style_text("Not retrieved:", ui::StyleType::Subtle));
        for failure in failures {
            output.push('\n');
            output.push_str(&ui::style_text(
                &format!("  {failure}"),
                ui::StyleType::Error,
            ));
        }
    }

    output
}

pub fn render_json(rates: &[ExchangeRate]) -> Result<String> {
    serde_json::to_string_pretty(rates).context("Failed to serialize exchange rates")
}

pub async fn run(config: &AppConfig, currencies: &[Currency], format: OutputFormat) -> Result<()> {
    let reporter = Arc::new(RecordingReporter::new());
    let provider = ExchangeRateProvider::new(config.feed.connector())
        .with_reporter(reporter.clone())
        .with_concurrency(config.feed.concurrency)
        .with_lookback_months(config.feed.lookback_months);

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = provider.get_exchange_rates(currencies).await;
    pb.finish_and_clear();

    match format {
        OutputFormat::Table => println!("{}", render_table(&rates, &reporter.failures())),
        OutputFormat::Json => println!("{}", render_json(&rates)?),
    }
    Ok(())
}
