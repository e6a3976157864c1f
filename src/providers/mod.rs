pub mod cnb;

pub use cnb::{CnbFeed, CnbFeedClient};
