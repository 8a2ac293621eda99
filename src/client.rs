//! HTTP access to Google Scholar.

use crate::error::{Result, ScholarError};
use crate::rate_limit::{RateLimiter, DEFAULT_DELAY};
use crate::types::FetchedPage;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Scholar origin: search, cite dialogs and relative export links.
pub const SCHOLAR_ORIGIN: &str = "https://scholar.google.com";

/// Static host serving `scholar.bib` exports for signed requests.
pub const EXPORT_ORIGIN: &str = "https://scholar.googleusercontent.com";

/// Browser-like identification; Scholar rejects obvious bots outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Paced GET client for Scholar pages.
///
/// Holds no cookies; every request carries a browser `User-Agent`.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> scholar_bib::error::Result<()> {
/// use std::time::Duration;
///
/// let client = scholar_bib::ScholarClient::new()?.with_delay(Duration::from_secs(5));
/// let page = client.fetch("https://scholar.google.com/scholar?q=ImageNet").await?;
/// println!("{} bytes", page.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScholarClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) export_url: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    pub(crate) rate_limiter: RateLimiter,
}

impl ScholarClient {
    /// Create a client pointed at the public Scholar hosts with the default delay.
    pub fn new() -> Result<Self> {
        let http = Client::builder().gzip(true).build()?;

        Ok(Self {
            http,
            base_url: SCHOLAR_ORIGIN.to_string(),
            export_url: EXPORT_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            rate_limiter: RateLimiter::new(DEFAULT_DELAY),
        })
    }

    /// Override the Scholar origin (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the export host (useful for testing).
    pub fn with_export_url(mut self, url: impl Into<String>) -> Self {
        self.export_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the delay between requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.rate_limiter = RateLimiter::new(delay);
        self
    }

    /// Override the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scholar origin used for searches and relative links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host used for direct `scholar.bib` exports.
    pub fn export_url(&self) -> &str {
        &self.export_url
    }

    /// GET `url` once the minimum interval since the last request has passed.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        self.rate_limiter.acquire().await;
        self.send(url).await
    }

    /// GET `url` after sleeping the full configured delay.
    pub async fn fetch_after_delay(&self, url: &str) -> Result<FetchedPage> {
        self.rate_limiter.pause().await;
        self.send(url).await
    }

    async fn send(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;

        let body = handle_response(response).await?;
        Ok(FetchedPage {
            url: url.to_string(),
            body,
        })
    }
}

/// Validate a user-supplied origin such as `https://scholar.google.com`.
///
/// Relative dialog links are joined onto the origin by string prefixing, so
/// it must be a bare `http(s)://host[:port]` with no path, query or fragment.
pub fn parse_origin(input: &str) -> Result<String> {
    let url = Url::parse(input)
        .map_err(|e| ScholarError::Config(format!("invalid origin {:?}: {}", input, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScholarError::Config(format!(
            "origin must be http or https: {}",
            input
        )));
    }
    if url.host_str().is_none()
        || url.path() != "/"
        || url.query().is_some()
        || url.fragment().is_some()
    {
        return Err(ScholarError::Config(format!(
            "origin must not carry a path, query or fragment: {}",
            input
        )));
    }
    Ok(input.trim_end_matches('/').to_string())
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ScholarError::RateLimited { retry_after })
        }
        _ => Err(ScholarError::Status {
            status,
            url: response.url().to_string(),
        }),
    }
}
