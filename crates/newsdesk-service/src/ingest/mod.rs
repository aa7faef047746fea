//! Ingestion adapters: turn an upstream resource into records ready to store.

use std::time::Duration;

use crate::errors::Result;

pub mod links;
pub mod news;
pub mod posts;
pub mod selectors;

pub use news::{NewsScraper, ScrapeReport, ScrapeWarning};
pub use posts::{PostFetchReport, PostFetcher};

pub const DEFAULT_USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client. `None` leaves requests without a timeout.
pub fn create_client(user_agent: &str, timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
