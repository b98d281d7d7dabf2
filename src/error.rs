// src/error.rs
// =============================================================================
// Typed errors for the lower layers (fetching and HTML scraping).
//
// The application layers (dataset builder, main) wrap these in anyhow::Error
// with extra context. Rate limiting (429) and not-found (404) are NOT errors
// here: the fetcher handles both itself and hands back a normal Page.
// =============================================================================

use thiserror::Error;

/// Failures while talking to the host.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The reqwest client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failures while turning fetched pages into links.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("invalid CSS selector '{css}': {message}")]
    Selector { css: String, message: String },

    #[error("invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Compiles a CSS selector, turning scraper's borrowed error into ours.
pub fn selector(css: &str) -> Result<scraper::Selector, ScrapeError> {
    scraper::Selector::parse(css).map_err(|e| ScrapeError::Selector {
        css: css.to_string(),
        message: e.to_string(),
    })
}
