//! HTTP fetching seam.
//!
//! The detector and version extractor only ever talk to a [`Fetcher`].
//! [`HttpFetcher`] is the reqwest-backed implementation used by the CLI;
//! tests substitute an in-memory one.

mod http;

pub use http::HttpFetcher;

use crate::error::{Error, Result};
use crate::model::FetchResult;
use async_trait::async_trait;
use url::Url;

/// Something that can retrieve a URL.
///
/// Implementations must not fail for ordinary network problems (timeouts,
/// DNS errors, refused connections). Those are reported as
/// [`FetchResult::failed`] so callers can treat them as "no evidence".
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`. When `allow_redirect` is false a 3xx response is
    /// returned as-is, with its `location` header.
    async fn fetch(&self, url: &str, allow_redirect: bool) -> FetchResult;
}

/// Resolves `path` against `base` the way a browser resolves a link.
pub fn join_path(base: &Url, path: &str) -> Result<String> {
    base.join(path)
        .map(|url| url.to_string())
        .map_err(|source| Error::InvalidUrl {
            url: format!("{}{}", base, path),
            source,
        })
}

/// Like [`join_path`], but drops one leading `/` so wordlist entries stay
/// relative to the base URL instead of replacing its path.
pub fn join_probe(base: &Url, path: &str) -> Result<String> {
    join_path(base, path.strip_prefix('/').unwrap_or(path))
}

/// Parses a user-supplied target, adding `http://` when no scheme is given.
pub fn parse_target(target: &str) -> Result<Url> {
    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    Url::parse(&with_scheme).map_err(|source| Error::InvalidUrl {
        url: target.to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory fetcher: unknown URLs behave like a dead host.
    #[derive(Default)]
    pub struct MockFetcher {
        routes: HashMap<String, FetchResult>,
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, url: impl Into<String>, result: FetchResult) -> Self {
            self.routes.insert(url.into(), result);
            self
        }

        /// Every `(url, allow_redirect)` pair fetched so far, in call order.
        pub fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn was_fetched(&self, url: &str) -> bool {
            self.calls().iter().any(|(u, _)| u == url)
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str, allow_redirect: bool) -> FetchResult {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((url.to_string(), allow_redirect));
            }
            self.routes
                .get(url)
                .cloned()
                .unwrap_or_else(FetchResult::failed)
        }
    }
}
