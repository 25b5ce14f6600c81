use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::FetchResult;

/// reqwest-backed [`Fetcher`](super::Fetcher).
///
/// Holds two clients because reqwest fixes the redirect policy at build time.
pub struct HttpFetcher {
    client: Client,
    no_redirect: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        let no_redirect = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            no_redirect,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs), &config.user_agent)
    }
}

#[async_trait]
impl super::Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, allow_redirect: bool) -> FetchResult {
        let client = if allow_redirect {
            &self.client
        } else {
            &self.no_redirect
        };

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "fetch failed");
                return FetchResult::failed();
            }
        };

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                // HeaderName is always lowercase
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.ok();

        debug!(url, status, "fetched");

        FetchResult {
            headers,
            status,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Fetcher;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const LOGIN_REDIRECT: &str = "/wp-login.php?redirect_to=%2Fwp-admin%2F&reauth=1";

    /// Serves a tiny site on loopback: `/wp-admin/` redirects to the login
    /// page, everything else answers 200 with a login form.
    async fn serve_admin_redirect() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let response = if request.starts_with("GET /wp-admin/ ") {
                    format!(
                        "HTTP/1.1 302 Found\r\nLocation: {}\r\n{}",
                        LOGIN_REDIRECT, "Content-Length: 0\r\nConnection: close\r\n\r\n"
                    )
                } else {
                    let body = "<form id=\"loginform\"></form>";
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/wp-admin/", addr)
    }

    #[test]
    fn test_from_config() {
        assert!(HttpFetcher::from_config(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_sentinel() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2), "wpscout-test").unwrap();
        // Port 1 on loopback refuses connections
        let result = fetcher.fetch("http://127.0.0.1:1/", true).await;
        assert!(result.is_failure());
        assert!(result.headers.is_empty());
    }

    #[tokio::test]
    async fn test_no_redirect_client_keeps_location() {
        let url = serve_admin_redirect().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "wpscout-test").unwrap();

        let result = fetcher.fetch(&url, false).await;
        assert_eq!(result.status, 302);
        assert_eq!(result.location(), LOGIN_REDIRECT);
        assert!(result.location().contains("wp-login.php?redirect_to="));
    }

    #[tokio::test]
    async fn test_redirects_are_followed_when_allowed() {
        let url = serve_admin_redirect().await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "wpscout-test").unwrap();

        let result = fetcher.fetch(&url, true).await;
        assert_eq!(result.status, 200);
        assert!(result.body.unwrap().contains("loginform"));
    }
}
