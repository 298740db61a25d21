use thiserror::Error;

/// Errors the Link Extractor can produce (§4.1).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse HTML document")]
    ParseError,
}

/// Fatal errors that can abort a `Crawl` invocation (§7).
///
/// `NonOkStatus` is deliberately absent from this enum: a non-200 response
/// is a dead end, not a fatal error, and never reaches this type.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to extract links from {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("on_discovered callback failed: {0}")]
    Callback(#[source] anyhow::Error),
}
