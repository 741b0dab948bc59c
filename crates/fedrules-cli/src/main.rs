use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fedrules_core::{DEFAULT_RULE_URLS, parse_url_list, rule_url};
use fedrules_scrape::{RuleScraper, ScrapeConfig};
use fedrules_store::JsonWriter;
use tracing::Level;

mod driver;

/// Scrape GAO federal rule pages into a JSON file.
#[derive(Parser, Debug)]
#[command(name = "fedrules", version)]
struct Cli {
    /// Rule page URLs. Defaults to three sample rules when no URLs, ids or
    /// input file are given.
    urls: Vec<String>,

    /// GAO rule identifier (repeatable); expands to https://www.gao.gov/fedrules/<id>
    #[arg(long = "rule-id", value_name = "ID")]
    rule_ids: Vec<String>,

    /// File with one URL per line ('#' starts a comment)
    #[arg(long, short, env = "FEDRULES_INPUT")]
    input: Option<PathBuf>,

    /// Output directory (created if absent)
    #[arg(long, env = "FEDRULES_DATA_PATH", default_value = "raw_data")]
    data_path: PathBuf,

    /// Output file base name; `.json` is appended
    #[arg(long, env = "FEDRULES_FILENAME", default_value = "rule_detail_test")]
    filename: String,

    /// Maximum concurrent fetches
    #[arg(long, env = "FEDRULES_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "FEDRULES_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Retries per page after a transient failure (0 = fail fast)
    #[arg(long, env = "FEDRULES_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Delay before the first retry, doubled on each further retry
    #[arg(long, env = "FEDRULES_RETRY_BACKOFF_MS", default_value_t = 500)]
    retry_backoff_ms: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "FEDRULES_USER_AGENT")]
    user_agent: Option<String>,

    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn scrape_config(&self) -> ScrapeConfig {
        let defaults = ScrapeConfig::default();
        ScrapeConfig {
            concurrency: self.concurrency,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            max_retries: self.max_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    /// URLs from positional args, then `--rule-id`s, then the input file.
    fn target_urls(&self) -> anyhow::Result<Vec<String>> {
        let mut urls = self.urls.clone();
        urls.extend(self.rule_ids.iter().map(|id| rule_url(id)));
        if let Some(path) = &self.input {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading URL list {}", path.display()))?;
            urls.extend(parse_url_list(&text));
        } else if urls.is_empty() {
            urls.extend(DEFAULT_RULE_URLS.iter().map(|s| s.to_string()));
        }
        Ok(urls)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("fedrules v{}", env!("CARGO_PKG_VERSION"));

    let urls = cli.target_urls()?;
    let scraper = RuleScraper::new(cli.scrape_config()).context("building HTTP client")?;

    let stats =
        driver::run_pipeline(&scraper, &JsonWriter, urls, &cli.data_path, &cli.filename).await?;

    tracing::info!(
        requests = stats.requests,
        records = stats.records,
        output = %stats.output.display(),
        wall_secs = stats.elapsed_secs,
        "done"
    );
    println!("Elapsed CPU time: {:.3}s", stats.cpu_secs);
    Ok(())
}
