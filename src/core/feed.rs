//! Rate feed abstractions

use crate::core::currency::Currency;
use crate::core::error::FeedError;
use async_trait::async_trait;
use chrono::{Months, NaiveDate};

/// Inclusive range of fixing dates requested from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Window ending on `today` and starting `months` calendar months earlier.
    pub fn ending_on(today: NaiveDate, months: u32) -> Self {
        let from = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        DateWindow { from, to: today }
    }
}

#[async_trait]
pub trait RateFeedClient: Send + Sync {
    /// Returns the raw body published for `currency_code`. A blank body means
    /// the feed has no data for it.
    async fn fetch(&self, currency_code: &str, window: &DateWindow) -> Result<String, FeedError>;
}

/// Hands out a client for the duration of one batch.
pub trait FeedConnector: Send + Sync {
    type Client: RateFeedClient;

    /// The currency every rate published by this feed is quoted in.
    fn base_currency(&self) -> Currency;

    fn connect(&self) -> Result<Self::Client, FeedError>;
}
