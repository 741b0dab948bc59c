use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Server { url: String, status: u16 },

    #[error("invalid scraper configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Whether another attempt at the same request may succeed.
    ///
    /// Transport failures (timeouts, resets), 5xx and 429 are transient;
    /// other statuses are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Http(e) => !e.is_builder() && !e.is_decode(),
            ScrapeError::Server { status, .. } => *status >= 500 || *status == 429,
            ScrapeError::Config(_) => false,
        }
    }
}
