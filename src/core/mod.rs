//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod feed;
pub mod log;
pub mod parser;
pub mod report;

// Re-export main types for cleaner imports
pub use currency::{Currency, ExchangeRate};
pub use error::{FailureKind, FeedError, ParseError, RateFailure};
pub use exchange::{ExchangeRateProvider, RateOutcome};
pub use feed::{DateWindow, FeedConnector, RateFeedClient};
pub use parser::parse_rate;
pub use report::{FailureReporter, LogReporter, RecordingReporter};
