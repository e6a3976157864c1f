use crate::core::currency::Currency;
use crate::core::error::FeedError;
use crate::core::feed::{DateWindow, FeedConnector, RateFeedClient};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.cnb.cz/en/financial-markets/foreign-exchange-market/central-bank-exchange-rate-fixing/central-bank-exchange-rate-fixing/selected.txt";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const FEED_DATE_FORMAT: &str = "%d.%m.%Y";

fn format_feed_date(date: NaiveDate) -> String {
    date.format(FEED_DATE_FORMAT).to_string()
}

/// Connection settings for the Czech National Bank fixing feed.
#[derive(Debug, Clone)]
pub struct CnbFeed {
    base_url: String,
    timeout: Duration,
}

impl CnbFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        CnbFeed {
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

impl Default for CnbFeed {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

impl FeedConnector for CnbFeed {
    type Client = CnbFeedClient;

    fn base_currency(&self) -> Currency {
        Currency::czk()
    }

    fn connect(&self) -> Result<CnbFeedClient, FeedError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| FeedError::InvalidUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .user_agent("cnb-rates/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(FeedError::Client)?;
        Ok(CnbFeedClient { base_url, client })
    }
}

pub struct CnbFeedClient {
    base_url: Url,
    client: reqwest::Client,
}

impl CnbFeedClient {
    fn request_url(&self, currency_code: &str, window: &DateWindow) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("from", &format_feed_date(window.from))
            .append_pair("to", &format_feed_date(window.to))
            .append_pair("currency", currency_code)
            .append_pair("format", "text");
        url
    }
}

#[async_trait]
impl RateFeedClient for CnbFeedClient {
    #[instrument(
        name = "CnbRateFetch",
        skip(self, window),
        fields(currency = %currency_code)
    )]
    async fn fetch(&self, currency_code: &str, window: &DateWindow) -> Result<String, FeedError> {
        let url = self.request_url(currency_code, window);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Request {
                currency: currency_code.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                currency: currency_code.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FeedError::Request {
            currency: currency_code.to_string(),
            source,
        })?;
        debug!(bytes = body.len(), "Received feed response");
        Ok(body)
    }
}
