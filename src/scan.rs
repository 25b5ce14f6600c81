//! End-to-end scan of one target.
//!
//! Samples the site's error page, runs detection, and only for WordPress
//! sites goes on to version inference and advisory lookup.

use indicatif::{ProgressBar, ProgressIterator};
use tracing::{info, warn};
use url::Url;

use crate::detector::{detect_with_outcome, fetch_error_page};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::model::ScanReport;
use crate::report::advisories;
use crate::version::{extract_version, VersionExtractor};
use crate::vulndb::VulnerabilityDatabase;

pub struct SiteScanner<'a> {
    fetcher: &'a dyn Fetcher,
    wordlist: Vec<String>,
    database: Option<&'a dyn VulnerabilityDatabase>,
    extractor: Option<VersionExtractor>,
    concurrency: usize,
    progress: Option<ProgressBar>,
}

impl<'a> SiteScanner<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, wordlist: Vec<String>) -> Self {
        Self {
            fetcher,
            wordlist,
            database: None,
            extractor: None,
            concurrency: 1,
            progress: None,
        }
    }

    pub fn with_database(mut self, database: &'a dyn VulnerabilityDatabase) -> Self {
        self.database = Some(database);
        self
    }

    /// Replaces the default extractor, which asks wordpress.org for the
    /// latest release.
    pub fn with_extractor(mut self, extractor: VersionExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Ticks `progress` once per detection probe.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scans `target`.
    ///
    /// # Errors
    ///
    /// Fails only on configuration or contract errors (empty wordlist,
    /// unjoinable URL, closed database). Unreachable targets produce a
    /// report saying WordPress was not found.
    pub async fn run(&self, target: &Url) -> Result<ScanReport> {
        let error_page = fetch_error_page(target, self.fetcher)
            .await?
            .unwrap_or_else(|| {
                warn!(target_url = %target, "could not sample error page");
                String::new()
            });

        let detection = match &self.progress {
            Some(pb) => {
                pb.set_length(self.wordlist.len() as u64);
                let outcome = detect_with_outcome(
                    target,
                    &error_page,
                    self.wordlist.iter().progress_with(pb.clone()),
                    self.fetcher,
                    self.concurrency,
                )
                .await;
                pb.finish_and_clear();
                outcome?
            }
            None => {
                detect_with_outcome(
                    target,
                    &error_page,
                    &self.wordlist,
                    self.fetcher,
                    self.concurrency,
                )
                .await?
            }
        };

        let report = ScanReport::new(target.as_str(), detection);
        if !detection.is_wordpress {
            info!(target_url = %target, "WordPress not detected");
            return Ok(report);
        }

        let version = match &self.extractor {
            Some(extractor) => extractor.extract(target, self.fetcher).await?,
            None => extract_version(target, self.fetcher).await?,
        };

        let found = match self.database {
            Some(db) => advisories(&version, db)?,
            None => Vec::new(),
        };

        Ok(report.with_version(version).with_advisories(found))
    }
}
