//! WordPress fingerprint detection.
//!
//! Detection runs in two stages. A sweep fetches every path of the probe
//! wordlist and counts the ones that answer 200 with content clearly
//! different from the site's "not found" page. When at least
//! [`HIT_RATE_THRESHOLD`] of the probes hit, the site is WordPress. Otherwise
//! a single request to `/wp-admin/` decides, since a reachable admin path on
//! its own is weak evidence (proxies and CDNs often answer 200 everywhere).
//!
//! # Example
//!
//! ```no_run
//! use wpscout::detector::{detect, fetch_error_page};
//! use wpscout::fetch::{parse_target, HttpFetcher};
//! use wpscout::wordlist::{WordlistLoader, DETECTION_WORDLIST};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = HttpFetcher::new(Duration::from_secs(10), "wpscout")?;
//!     let base = parse_target("https://blog.example.com/")?;
//!     let error_page = fetch_error_page(&base, &fetcher).await?.unwrap_or_default();
//!     let wordlist = WordlistLoader::embedded().get_wordlist(DETECTION_WORDLIST)?;
//!
//!     if detect(&base, &error_page, &wordlist, &fetcher).await? {
//!         println!("WordPress found");
//!     }
//!     Ok(())
//! }
//! ```

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{join_path, join_probe, Fetcher};
use crate::model::{DetectionOutcome, FetchResult};
use crate::similarity::ratio_opt;

/// A probe page scoring below this against the error page counts as distinct.
pub const MATCH_RATIO_THRESHOLD: f64 = 0.35;

/// Sweep hit rate at or above which no corroboration is needed.
pub const HIT_RATE_THRESHOLD: f64 = 0.85;

/// Administrative path used as the tie-break probe.
pub const ADMIN_PATH: &str = "/wp-admin/";

/// Where WordPress sends anonymous visitors of `/wp-admin/`.
const LOGIN_REDIRECT_MARKER: &str = "wp-login.php?redirect_to=";

/// Returns true if the site at `base` looks like a WordPress installation.
///
/// Probes are fetched one at a time, in wordlist order.
///
/// # Errors
///
/// Returns [`Error::EmptyWordlist`] when `wordlist` yields no paths, and
/// [`Error::InvalidUrl`] when `/wp-admin/` cannot be joined to `base`. Failed
/// fetches and paths that do not form a URL count as misses.
pub async fn detect<I, S>(
    base: &Url,
    error_page: &str,
    wordlist: I,
    fetcher: &dyn Fetcher,
) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    detect_with_outcome(base, error_page, wordlist, fetcher, 1)
        .await
        .map(|outcome| outcome.is_wordpress)
}

/// Like [`detect`], but keeps up to `concurrency` probes in flight and
/// returns the counters behind the decision.
///
/// Each probe is classified on its own and the results are summed, so the
/// counters do not depend on completion order.
pub async fn detect_with_outcome<I, S>(
    base: &Url,
    error_page: &str,
    wordlist: I,
    fetcher: &dyn Fetcher,
    concurrency: usize,
) -> Result<DetectionOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (total_probed, matched_as_distinct) = stream::iter(wordlist)
        .map(move |path| async move {
            let url = match join_probe(base, path.as_ref()) {
                Ok(url) => url,
                Err(e) => {
                    debug!(path = path.as_ref(), error = %e, "skipping unjoinable path");
                    return false;
                }
            };
            let result = fetcher.fetch(&url, true).await;
            let distinct = is_distinct(&result, error_page);
            debug!(url = %url, status = result.status, distinct, "probe");
            distinct
        })
        .buffer_unordered(concurrency.max(1))
        .fold((0usize, 0usize), |(total, matched), distinct| async move {
            (total + 1, matched + usize::from(distinct))
        })
        .await;

    if total_probed == 0 {
        return Err(Error::EmptyWordlist);
    }

    let mut outcome = DetectionOutcome {
        total_probed,
        matched_as_distinct,
        ..Default::default()
    };

    let hit_rate = outcome.hit_rate();
    if hit_rate >= HIT_RATE_THRESHOLD {
        info!(target_url = %base, hit_rate, "WordPress confirmed by probe sweep");
        outcome.is_wordpress = true;
        return Ok(outcome);
    }

    // Redirects are not followed so the 3xx target stays visible.
    let admin_url = join_path(base, ADMIN_PATH)?;
    let admin = fetcher.fetch(&admin_url, false).await;
    outcome.tie_break_used = true;
    outcome.is_wordpress = admin_confirms(&admin);

    info!(
        target_url = %base,
        hit_rate,
        admin_status = admin.status,
        is_wordpress = outcome.is_wordpress,
        "detection decided by admin probe"
    );

    Ok(outcome)
}

/// Fetches a path that cannot exist and returns the body the site serves for it.
///
/// The body is the reference "not found" page the detector compares probes
/// against. `None` means the request failed.
pub async fn fetch_error_page(base: &Url, fetcher: &dyn Fetcher) -> Result<Option<String>> {
    let path = format!("{:x}-wpscout-not-found.html", Utc::now().timestamp_micros());
    let url = join_probe(base, &path)?;
    let result = fetcher.fetch(&url, true).await;
    debug!(url = %url, status = result.status, "sampled error page");
    Ok(result.body)
}

fn is_distinct(result: &FetchResult, error_page: &str) -> bool {
    result.status == 200 && ratio_opt(result.body.as_deref(), error_page) < MATCH_RATIO_THRESHOLD
}

fn admin_confirms(admin: &FetchResult) -> bool {
    match admin.status {
        302 => admin.location().contains(LOGIN_REDIRECT_MARKER),
        301 => admin.location().contains(ADMIN_PATH),
        200 => true,
        _ => false,
    }
}
