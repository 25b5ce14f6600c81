//! Installed and latest WordPress version inference.
//!
//! Two independent signals are read first: the version line of
//! `/readme.html` and the generator meta tag of the home page. When they
//! disagree the meta tag wins, since the readme is often left behind by
//! upgrades. Only if neither yields a version are the fallback endpoints
//! tried, in [`FALLBACK_ENDPOINTS`] order, stopping at the first hit.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::fetch::{join_path, Fetcher};
use crate::model::{is_dotted_numeric, VersionInfo, UNKNOWN_VERSION};

pub const README_PATH: &str = "/readme.html";

/// Upstream page advertising the latest WordPress release.
pub const LATEST_VERSION_URL: &str = "https://wordpress.org/download/";

static README_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<br[\s]*/>[\s]*[Vv]ersion[\s]*)([\d]\.[\d]\.*[\d]*)").expect("readme regex")
});

static GENERATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(<meta name="generator" content="WordPress[\s]+)([0-9\.]+)"#)
        .expect("generator regex")
});

static LATEST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(WordPress&nbsp;)([0-9\.]*)").expect("latest regex"));

static ASSET_VER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(;ver=)([0-9\.]+)([\-a-z]*)").expect("asset ver regex"));

static CSS_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Version[\s]+)([0-9\.]+)").expect("css header regex"));

/// Endpoints tried when neither primary signal resolves, with the pattern
/// whose second group holds the version.
pub static FALLBACK_ENDPOINTS: Lazy<[(&'static str, &'static Regex); 3]> = Lazy::new(|| {
    [
        ("wp-login.php", &*ASSET_VER_RE),
        // Stylesheet headers carry the version since WordPress 3.8
        ("wp-admin/css/wp-admin-rtl.css", &*CSS_HEADER_RE),
        ("wp-admin/css/wp-admin.css", &*CSS_HEADER_RE),
    ]
});

/// Infers installed and latest versions of a WordPress site.
///
/// # Example
///
/// ```no_run
/// use wpscout::fetch::{parse_target, HttpFetcher};
/// use wpscout::version::VersionExtractor;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let fetcher = HttpFetcher::new(Duration::from_secs(10), "wpscout")?;
///     let site = parse_target("https://blog.example.com/")?;
///
///     let info = VersionExtractor::new().extract(&site, &fetcher).await?;
///     println!("{} (latest {})", info.current_version, info.last_version);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    latest_version_url: String,
}

impl VersionExtractor {
    pub fn new() -> Self {
        Self::with_latest_url(LATEST_VERSION_URL)
    }

    /// Uses `url` instead of wordpress.org as the latest-release reference.
    pub fn with_latest_url(url: impl Into<String>) -> Self {
        Self {
            latest_version_url: url.into(),
        }
    }

    /// Resolves the installed version and the latest upstream version.
    ///
    /// Failed fetches and unmatched pages only degrade their own signal;
    /// anything unresolved ends up as `"unknown"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if an
    /// endpoint path cannot be joined to `base`.
    pub async fn extract(&self, base: &Url, fetcher: &dyn Fetcher) -> Result<VersionInfo> {
        let readme = readme_signal(base, fetcher).await?;
        let generator = generator_signal(base, fetcher).await;

        let mut current_version = reconcile(readme, generator);
        if current_version == UNKNOWN_VERSION {
            if let Some(version) = fallback_sweep(base, fetcher).await? {
                current_version = version;
            }
        }

        let last_version = latest_version(&self.latest_version_url, fetcher).await;

        info!(
            target_url = %base,
            current = %current_version,
            latest = %last_version,
            "version inferred"
        );

        Ok(VersionInfo::new(current_version, last_version))
    }
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// [`VersionExtractor::extract`] against wordpress.org.
pub async fn extract_version(base: &Url, fetcher: &dyn Fetcher) -> Result<VersionInfo> {
    VersionExtractor::new().extract(base, fetcher).await
}

/// Picks the installed version from the readme and generator signals.
///
/// The generator tag wins when both are present and differ.
pub fn reconcile(readme: Option<String>, generator: Option<String>) -> String {
    match (readme, generator) {
        (None, None) => UNKNOWN_VERSION.to_string(),
        (Some(readme), None) => readme,
        (None, Some(generator)) => generator,
        (Some(readme), Some(generator)) if readme == generator => readme,
        (Some(readme), Some(generator)) => {
            debug!(%readme, %generator, "version signals disagree, using generator tag");
            generator
        }
    }
}

async fn readme_signal(base: &Url, fetcher: &dyn Fetcher) -> Result<Option<String>> {
    let url = join_path(base, README_PATH)?;
    let result = fetcher.fetch(&url, true).await;
    let version = result
        .body
        .as_deref()
        .and_then(|body| capture_version(&README_RE, body));
    debug!(url = %url, ?version, "readme signal");
    Ok(version)
}

async fn generator_signal(base: &Url, fetcher: &dyn Fetcher) -> Option<String> {
    let result = fetcher.fetch(base.as_str(), true).await;
    let version = result
        .body
        .as_deref()
        .and_then(|body| capture_version(&GENERATOR_RE, body));
    debug!(url = %base, ?version, "generator signal");
    version
}

async fn fallback_sweep(base: &Url, fetcher: &dyn Fetcher) -> Result<Option<String>> {
    for (endpoint, pattern) in FALLBACK_ENDPOINTS.iter() {
        let url = join_path(base, endpoint)?;
        let result = fetcher.fetch(&url, false).await;

        if let Some(version) = result
            .body
            .as_deref()
            .and_then(|body| capture_version(pattern, body))
        {
            debug!(url = %url, %version, "fallback endpoint matched");
            return Ok(Some(version));
        }
    }

    Ok(None)
}

async fn latest_version(url: &str, fetcher: &dyn Fetcher) -> String {
    let result = fetcher.fetch(url, true).await;
    result
        .body
        .as_deref()
        .and_then(|body| capture_version(&LATEST_RE, body))
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// Second capture group of the first match, if it looks like a version.
fn capture_version(pattern: &Regex, body: &str) -> Option<String> {
    let captured = pattern.captures(body)?.get(2)?.as_str();
    is_dotted_numeric(captured).then(|| captured.to_string())
}
