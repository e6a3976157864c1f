//! Batch retrieval of exchange rates published by a rate feed.
//!
//! Each requested currency is fetched and parsed as an independent unit of
//! work. A unit ends in a [`RateOutcome`]; failures are handed to a
//! [`FailureReporter`] and never abort the batch.

use crate::core::currency::{Currency, ExchangeRate};
use crate::core::error::{FailureKind, RateFailure};
use crate::core::feed::{DateWindow, FeedConnector, RateFeedClient};
use crate::core::parser::parse_rate;
use crate::core::report::{FailureReporter, LogReporter};
use chrono::NaiveDate;
use futures::{FutureExt, StreamExt, stream};
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 1;

/// Result of processing one requested currency.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    Rate(ExchangeRate),
    /// The feed has nothing published for the currency.
    NoData,
    Failed(RateFailure),
}

pub struct ExchangeRateProvider<C: FeedConnector> {
    connector: C,
    base_currency: Currency,
    lookback_months: u32,
    concurrency: usize,
    reporter: Arc<dyn FailureReporter>,
}

impl<C: FeedConnector> ExchangeRateProvider<C> {
    /// Rates are labelled with the connector's base currency.
    pub fn new(connector: C) -> Self {
        let base_currency = connector.base_currency();
        ExchangeRateProvider {
            connector,
            base_currency,
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            concurrency: DEFAULT_CONCURRENCY,
            reporter: Arc::new(LogReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Maximum number of currencies in flight at once; `1` processes them one
    /// after another.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_lookback_months(mut self, months: u32) -> Self {
        self.lookback_months = months;
        self
    }

    pub fn base_currency(&self) -> &Currency {
        &self.base_currency
    }

    /// Returns the rates the feed publishes for `currencies`, quoted in the
    /// base currency. Currencies without data or whose request failed are
    /// left out.
    pub async fn get_exchange_rates(&self, currencies: &[Currency]) -> Vec<ExchangeRate> {
        let today = chrono::Local::now().date_naive();
        self.get_exchange_rates_as_of(currencies, today).await
    }

    #[instrument(
        name = "ExchangeRateBatch",
        skip(self, currencies),
        fields(base = %self.base_currency, requested = currencies.len())
    )]
    pub async fn get_exchange_rates_as_of(
        &self,
        currencies: &[Currency],
        today: NaiveDate,
    ) -> Vec<ExchangeRate> {
        let window = DateWindow::ending_on(today, self.lookback_months);

        let mut seen = HashSet::new();
        let requested: Vec<&Currency> = currencies
            .iter()
            .filter(|currency| seen.insert(currency.code()))
            .collect();

        // Client lives until the end of this batch
        let client = match self.connector.connect() {
            Ok(client) => client,
            Err(err) => {
                for currency in &requested {
                    self.reporter
                        .report(&RateFailure::transport(currency.code(), &err));
                }
                return Vec::new();
            }
        };

        let outcomes: Vec<RateOutcome> = stream::iter(requested)
            .map(|currency| self.resolve_guarded(&client, currency, &window))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut rates = Vec::with_capacity(outcomes.len());
        let mut failed = 0;
        for outcome in outcomes {
            match outcome {
                RateOutcome::Rate(rate) => rates.push(rate),
                RateOutcome::NoData => {}
                RateOutcome::Failed(failure) => {
                    failed += 1;
                    self.reporter.report(&failure);
                }
            }
        }

        info!(
            retrieved = rates.len(),
            failed, "Finished exchange rate batch"
        );
        rates
    }

    async fn resolve_guarded(
        &self,
        client: &C::Client,
        currency: &Currency,
        window: &DateWindow,
    ) -> RateOutcome {
        AssertUnwindSafe(self.resolve(client, currency, window))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                RateOutcome::Failed(RateFailure::new(
                    currency.code(),
                    FailureKind::Unexpected,
                    panic_message(panic.as_ref()),
                ))
            })
    }

    async fn resolve(
        &self,
        client: &C::Client,
        currency: &Currency,
        window: &DateWindow,
    ) -> RateOutcome {
        let body = match client.fetch(currency.code(), window).await {
            Ok(body) => body,
            Err(err) => return RateOutcome::Failed(RateFailure::transport(currency.code(), &err)),
        };

        if body.trim().is_empty() {
            debug!(currency = %currency, "No data published");
            return RateOutcome::NoData;
        }

        let value = match parse_rate(&body) {
            Ok(value) => value,
            Err(err) => return RateOutcome::Failed(RateFailure::parse(currency.code(), &err)),
        };

        // `parse_rate` only returns positive rates, so the `None` arm needs a
        // feed parser that breaks that contract
        match ExchangeRate::new(self.base_currency.clone(), currency.clone(), value) {
            Some(rate) => {
                debug!(%rate, "Parsed exchange rate");
                RateOutcome::Rate(rate)
            }
            None => RateOutcome::Failed(RateFailure::new(
                currency.code(),
                FailureKind::Unexpected,
                format!("Parsed rate {value} is not positive"),
            )),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("Panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("Panicked: {message}")
    } else {
        "Panicked while processing currency".to_string()
    }
}
