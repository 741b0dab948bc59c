//! Scrape pipeline: build requests → scrape → persist.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use cpu_time::ProcessTime;
use fedrules_core::build_requests;
use fedrules_scrape::RuleSource;
use fedrules_store::{RecordSink, ensure_dir};
use tracing::info;

pub struct RunStats {
    pub requests: usize,
    pub records: usize,
    pub output: PathBuf,
    /// Process CPU time spent in the pipeline.
    pub cpu_secs: f64,
    /// Wall-clock time spent in the pipeline.
    pub elapsed_secs: f64,
}

/// Run the full pipeline for `urls`, writing `<data_path>/<filename>.json`.
///
/// The output directory is created before any fetch, so it exists even when
/// `urls` is empty or the scrape fails.
pub async fn run_pipeline(
    source: &dyn RuleSource,
    sink: &dyn RecordSink,
    urls: Vec<String>,
    data_path: &Path,
    filename: &str,
) -> anyhow::Result<RunStats> {
    let start = Instant::now();
    let cpu_start = ProcessTime::try_now().context("reading process CPU clock")?;

    // 1. Output directory first, so it exists even if the scrape fails.
    ensure_dir(data_path)
        .with_context(|| format!("preparing data directory {}", data_path.display()))?;

    // 2. Build requests.
    let requests = build_requests(urls);
    info!(count = requests.len(), "built scrape requests");

    // 3. Scrape.
    let records = source
        .fetch(&requests)
        .await
        .context("scraping rule pages")?;

    // 4. Persist.
    let output = sink
        .persist(&records, data_path, filename)
        .context("writing rule detail records")?;

    let cpu_secs = cpu_start
        .try_elapsed()
        .context("reading process CPU clock")?
        .as_secs_f64();

    Ok(RunStats {
        requests: requests.len(),
        records: records.len(),
        output,
        cpu_secs,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use fedrules_core::{DEFAULT_RULE_URLS, RuleDetailRecord, ScrapeRequest, rule_id_from_url};
    use fedrules_scrape::ScrapeError;
    use fedrules_store::JsonWriter;
    use tempfile::TempDir;

    /// Echoes each request back as a record and remembers what it was asked.
    #[derive(Default)]
    struct FakeSource {
        seen: Mutex<Vec<ScrapeRequest>>,
    }

    #[async_trait::async_trait]
    impl RuleSource for FakeSource {
        async fn fetch(
            &self,
            requests: &[ScrapeRequest],
        ) -> Result<Vec<RuleDetailRecord>, ScrapeError> {
            self.seen.lock().unwrap().extend_from_slice(requests);
            Ok(requests
                .iter()
                .map(|r| RuleDetailRecord {
                    url: r.url.clone(),
                    rule_id: rule_id_from_url(&r.url),
                    title: None,
                    fields: BTreeMap::new(),
                    scraped_at: "2026-10-19T10:00:00+00:00".into(),
                })
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl RuleSource for FailingSource {
        async fn fetch(
            &self,
            requests: &[ScrapeRequest],
        ) -> Result<Vec<RuleDetailRecord>, ScrapeError> {
            Err(ScrapeError::Server {
                url: requests[0].url.clone(),
                status: 500,
            })
        }
    }

    /// Burns CPU before echoing, so the pipeline has CPU time to report.
    struct BusySource(FakeSource);

    #[async_trait::async_trait]
    impl RuleSource for BusySource {
        async fn fetch(
            &self,
            requests: &[ScrapeRequest],
        ) -> Result<Vec<RuleDetailRecord>, ScrapeError> {
            let spin = Instant::now();
            let mut acc = 0u64;
            while spin.elapsed() < std::time::Duration::from_millis(50) {
                acc = std::hint::black_box(acc.wrapping_mul(31).wrapping_add(7));
            }
            std::hint::black_box(acc);
            self.0.fetch(requests).await
        }
    }

    fn default_urls() -> Vec<String> {
        DEFAULT_RULE_URLS.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn default_urls_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("raw_data");
        let source = FakeSource::default();

        let stats = run_pipeline(&source, &JsonWriter, default_urls(), &data, "rule_detail_test")
            .await
            .unwrap();

        let seen = source.seen.lock().unwrap().clone();
        let expected: Vec<ScrapeRequest> = DEFAULT_RULE_URLS
            .iter()
            .map(|u| ScrapeRequest::new(*u))
            .collect();
        assert_eq!(seen, expected);

        assert_eq!(stats.requests, 3);
        assert_eq!(stats.records, 3);
        assert_eq!(stats.output, data.join("rule_detail_test.json"));
        assert!(stats.cpu_secs >= 0.0);
        assert!(stats.elapsed_secs >= 0.0);

        let written: Vec<RuleDetailRecord> =
            serde_json::from_str(&std::fs::read_to_string(&stats.output).unwrap()).unwrap();
        let ids: Vec<_> = written.iter().map(|r| r.rule_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("207897"), Some("207898"), Some("207899")]);
    }

    #[tokio::test]
    async fn reports_process_cpu_time() {
        let tmp = TempDir::new().unwrap();
        let source = BusySource(FakeSource::default());

        let stats = run_pipeline(&source, &JsonWriter, default_urls(), tmp.path(), "busy")
            .await
            .unwrap();

        assert!(stats.cpu_secs > 0.0, "cpu time was {}", stats.cpu_secs);
        assert!(stats.elapsed_secs >= 0.04);
    }

    #[tokio::test]
    async fn empty_url_list_still_creates_dir_and_writes_empty_array() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("a").join("raw_data");

        let stats = run_pipeline(&FakeSource::default(), &JsonWriter, vec![], &data, "empty")
            .await
            .unwrap();

        assert!(data.is_dir());
        assert_eq!(stats.records, 0);
        let text = std::fs::read_to_string(&stats.output).unwrap();
        assert_eq!(text.trim(), "[]");
    }

    #[tokio::test]
    async fn scrape_failure_leaves_dir_but_no_file() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("raw_data");

        let err = run_pipeline(&FailingSource, &JsonWriter, default_urls(), &data, "out")
            .await
            .err()
            .unwrap();

        assert!(format!("{err:#}").contains("returned 500"));
        assert!(data.is_dir());
        assert!(!data.join("out.json").exists());
    }
}
