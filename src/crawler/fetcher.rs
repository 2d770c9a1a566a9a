//! HTTP-backed renderer
//!
//! This module renders pages with plain HTTP requests, for shops whose
//! listings are served as static markup:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to load a page and follow pagination links
//! - Error classification into render failures
//!
//! There is no script execution, so the scrollable height is reported as 0
//! and only anchor controls (those carrying an `href`) can be activated.

use crate::config::UserAgentConfig;
use crate::crawler::parser;
use crate::crawler::renderer::{PaginationControl, RenderSession, Renderer};
use crate::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound on a whole request
///
/// # Example
///
/// ```no_run
/// use product_scout::config::UserAgentConfig;
/// use product_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ProductScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(60)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer that loads pages with HTTP GET requests
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    timeout: Duration,
}

impl HttpRenderer {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self> {
        let client = build_http_client(config, timeout).map_err(|source| ScoutError::Http {
            url: String::new(),
            source,
        })?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    type Session = HttpSession;

    async fn open(&self, url: &Url) -> Result<HttpSession> {
        let (final_url, body) = fetch_page(&self.client, url, self.timeout).await?;
        Ok(HttpSession {
            client: self.client.clone(),
            timeout: self.timeout,
            url: final_url,
            body,
            closed: false,
        })
    }
}

/// A page loaded over HTTP
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    timeout: Duration,
    url: Url,
    body: String,
    closed: bool,
}

impl HttpSession {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ScoutError::Render {
                url: self.url.to_string(),
                message: "session already closed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn scroll_height(&mut self) -> Result<u32> {
        self.ensure_open()?;
        Ok(0)
    }

    async fn scroll_by(&mut self, _px: u32) -> Result<()> {
        self.ensure_open()
    }

    async fn content(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.body.clone())
    }

    async fn find_control(&mut self, selectors: &[&str]) -> Result<Option<PaginationControl>> {
        self.ensure_open()?;
        Ok(parser::find_control(&self.body, selectors, true))
    }

    async fn activate(&mut self, control: &PaginationControl) -> Result<()> {
        self.ensure_open()?;

        let href = control.href.as_deref().ok_or_else(|| ScoutError::Render {
            url: self.url.to_string(),
            message: format!("control '{}' has no link target", control.selector),
        })?;

        let target = self.url.join(href).map_err(|e| ScoutError::Render {
            url: self.url.to_string(),
            message: format!("cannot resolve '{}': {}", href, e),
        })?;

        let (final_url, body) = fetch_page(&self.client, &target, self.timeout).await?;
        self.url = final_url;
        self.body = body;
        Ok(())
    }

    fn current_url(&self) -> Url {
        self.url.clone()
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.body.clear();
        }
    }
}

/// Fetches a page, returning the final URL after redirects and the body
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `Timeout` |
/// | Connection or body failure | `Http` |
/// | Non-2xx status | `Render` |
async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> Result<(Url, String)> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| classify_error(url, source, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScoutError::Render {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|source| classify_error(url, source, timeout))?;

    Ok((final_url, body))
}

fn classify_error(url: &Url, source: reqwest::Error, timeout: Duration) -> ScoutError {
    if source.is_timeout() {
        ScoutError::Timeout {
            url: url.to_string(),
            after: timeout,
        }
    } else {
        ScoutError::Http {
            url: url.to_string(),
            source,
        }
    }
}
