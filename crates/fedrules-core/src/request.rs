//! Scrape requests and the URL list builder.
//!
//! A [`ScrapeRequest`] wraps exactly one URL. The builder does no validation,
//! deduplication or normalisation: what goes in comes out, in the same order.

use serde::{Deserialize, Serialize};

/// Base URL of the GAO federal rules database.
pub const FEDRULES_BASE_URL: &str = "https://www.gao.gov/fedrules";

/// Rule pages scraped when no URLs are given on the command line.
pub const DEFAULT_RULE_URLS: [&str; 3] = [
    "https://www.gao.gov/fedrules/207897",
    "https://www.gao.gov/fedrules/207898",
    "https://www.gao.gov/fedrules/207899",
];

/// A single page to fetch.
///
/// Serialises to `{"url": "..."}` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Wrap each URL in a [`ScrapeRequest`], preserving order.
pub fn build_requests<I, S>(urls: I) -> Vec<ScrapeRequest>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter().map(ScrapeRequest::new).collect()
}

/// URL of the rule page with the given GAO identifier.
///
/// `rule_url("207897")` → `https://www.gao.gov/fedrules/207897`
pub fn rule_url(id: &str) -> String {
    format!("{}/{}", FEDRULES_BASE_URL, id.trim())
}

/// Parse a newline-separated URL list.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with `#`
/// are skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Extract the GAO rule identifier from a rule URL.
///
/// The identifier is the last path segment when it is entirely ASCII digits.
/// Query string, fragment and a trailing slash are ignored.
pub fn rule_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        Some(segment.to_string())
    } else {
        None
    }
}
