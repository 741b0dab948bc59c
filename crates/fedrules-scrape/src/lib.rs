//! Scrape layer: fetch GAO federal rule pages over HTTP and extract rule details.

mod client;
mod config;
mod error;
pub mod extract;

pub use client::{RuleScraper, RuleSource};
pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use extract::extract_rule;
