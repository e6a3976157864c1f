//! Error types for fetching and parsing feed responses

use std::fmt::Display;
use thiserror::Error;

/// Failure to get a response body from the feed for one currency.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid feed URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request failed for currency {currency}: {source}")]
    Request {
        currency: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Feed returned HTTP {status} for currency {currency}")]
    Status { currency: String, status: u16 },
}

/// The response body does not have the expected layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Response body is empty")]
    Empty,

    #[error("No 'Amount' field found")]
    MissingAmount,

    #[error("Found {0} 'Amount' fields, expected exactly one")]
    DuplicateAmount(usize),

    #[error("Invalid unit amount: '{0}'")]
    InvalidUnitAmount(String),

    #[error("Unit amount is zero")]
    ZeroUnitAmount,

    #[error("Invalid quoted value: '{0}'")]
    InvalidValue(String),

    #[error("Quoted value must be positive: '{0}'")]
    NonPositiveValue(String),

    #[error("Quoted value '{0}' is too small to split into single units")]
    RateUnderflow(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
    Unexpected,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FailureKind::Transport => "transport",
                FailureKind::Parse => "parse",
                FailureKind::Unexpected => "unexpected",
            }
        )
    }
}

/// A currency that could not be resolved to a rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateFailure {
    pub currency_code: String,
    pub kind: FailureKind,
    pub message: String,
}

impl RateFailure {
    pub fn new(currency_code: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        RateFailure {
            currency_code: currency_code.to_string(),
            kind,
            message: message.into(),
        }
    }

    pub fn transport(currency_code: &str, err: &FeedError) -> Self {
        Self::new(currency_code, FailureKind::Transport, err.to_string())
    }

    pub fn parse(currency_code: &str, err: &ParseError) -> Self {
        Self::new(currency_code, FailureKind::Parse, err.to_string())
    }
}

impl Display for RateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error for {}: {}",
            self.kind, self.currency_code, self.message
        )
    }
}
