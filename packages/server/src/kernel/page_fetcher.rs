//! HTTP page fetcher - plain reqwest GET with browser-like headers.
//!
//! No JavaScript rendering and no retries. Callers get a typed
//! [`FetchError`] for anything other than a 2xx response.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{BasePageFetcher, FetchError, FetchedPage};

/// Browser-like User-Agent; several Thai news sites reject unknown agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,th;q=0.8,en-US;q=0.7,en;q=0.5"),
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Normalize URL by adding https:// if no scheme is present
    fn normalize_url(url: &str) -> String {
        let url = url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }
}

#[async_trait]
impl BasePageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let normalized = Self::normalize_url(url);
        let parsed = Url::parse(&normalized).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        debug!(url = %parsed, "Fetching page");

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %parsed, error = %e, "HTTP request failed");
                FetchError::Network {
                    url: parsed.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %parsed, status = %status, "HTTP error status");
            return Err(FetchError::Status {
                url: parsed.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| FetchError::Network {
            url: final_url.clone(),
            message: e.to_string(),
        })?;

        debug!(url = %final_url, bytes = html.len(), "Fetched page");
        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }
}
