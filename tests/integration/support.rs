//! Scripted in-memory renderer shared by the integration tests

use async_trait::async_trait;
use product_scout::config::{Config, CrawlerConfig, OutputConfig, ScrollConfig, UserAgentConfig};
use product_scout::crawler::{PaginationControl, RenderSession, Renderer};
use product_scout::{Result, ScoutError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// A page as the renderer will show it
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub links: Vec<String>,
    pub next: Option<String>,
    /// Number of times opening this page fails before it succeeds
    pub failures: usize,
}

impl ScriptedPage {
    pub fn links(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next = Some(next.to_string());
        self
    }

    pub fn failing(mut self, times: usize) -> Self {
        self.failures = times;
        self
    }
}

/// Renderer serving a fixed set of pages keyed by URL, query included
///
/// Clones share their counters, so a test can keep one handle while the
/// coordinator owns another.
#[derive(Clone, Default)]
pub struct ScriptedSite {
    inner: Arc<SiteState>,
}

#[derive(Default)]
struct SiteState {
    pages: Arc<HashMap<String, ScriptedPage>>,
    remaining_failures: Mutex<HashMap<String, usize>>,
    opens: Mutex<HashMap<String, usize>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    delay: Duration,
    panic_host: Option<String>,
}

impl ScriptedSite {
    pub fn new(pages: Vec<(&str, ScriptedPage)>) -> Self {
        Self::build(pages, Duration::ZERO, None)
    }

    /// Keeps every session open for `delay` so concurrent sessions overlap
    pub fn with_delay(pages: Vec<(&str, ScriptedPage)>, delay: Duration) -> Self {
        Self::build(pages, delay, None)
    }

    /// Makes `open` panic for any URL on `host`
    pub fn panicking_on(pages: Vec<(&str, ScriptedPage)>, host: &str) -> Self {
        Self::build(pages, Duration::ZERO, Some(host.to_string()))
    }

    fn build(pages: Vec<(&str, ScriptedPage)>, delay: Duration, panic_host: Option<String>) -> Self {
        let pages = pages
            .into_iter()
            .map(|(url, page)| (url.to_string(), page))
            .collect();
        Self {
            inner: Arc::new(SiteState {
                pages: Arc::new(pages),
                delay,
                panic_host,
                ..SiteState::default()
            }),
        }
    }

    pub fn opens(&self, url: &str) -> usize {
        self.inner.opens.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }
}

impl SiteState {
    fn check_failure(&self, key: &str, page: &ScriptedPage) -> bool {
        let mut remaining = self.remaining_failures.lock().unwrap();
        let left = remaining.entry(key.to_string()).or_insert(page.failures);
        if *left > 0 {
            *left -= 1;
            return true;
        }
        false
    }
}

#[async_trait]
impl Renderer for ScriptedSite {
    type Session = ScriptedTab;

    async fn open(&self, url: &Url) -> Result<ScriptedTab> {
        let site = &self.inner;
        if site.panic_host.as_deref() == url.host_str() {
            panic!("renderer crashed on {}", url);
        }

        let key = url.to_string();
        *site.opens.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        let Some(page) = site.pages.get(&key) else {
            return Err(ScoutError::Render {
                url: key,
                message: "HTTP 404".to_string(),
            });
        };

        if site.check_failure(&key, page) {
            return Err(ScoutError::Render {
                url: key,
                message: "target crashed".to_string(),
            });
        }

        let now = site.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        site.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let tab = ScriptedTab {
            pages: site.pages.clone(),
            url: url.clone(),
            in_flight: site.in_flight.clone(),
            closes: site.closes.clone(),
            closed: false,
        };

        if !site.delay.is_zero() {
            tokio::time::sleep(site.delay).await;
        }
        Ok(tab)
    }
}

pub struct ScriptedTab {
    pages: Arc<HashMap<String, ScriptedPage>>,
    url: Url,
    in_flight: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    closed: bool,
}

impl ScriptedTab {
    fn page(&self) -> Result<&ScriptedPage> {
        self.pages
            .get(self.url.as_str())
            .ok_or_else(|| ScoutError::Render {
                url: self.url.to_string(),
                message: "HTTP 404".to_string(),
            })
    }
}

#[async_trait]
impl RenderSession for ScriptedTab {
    async fn scroll_height(&mut self) -> Result<u32> {
        Ok(0)
    }

    async fn scroll_by(&mut self, _px: u32) -> Result<()> {
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        let anchors: Vec<String> = self
            .page()?
            .links
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        Ok(format!("<html><body>{}</body></html>", anchors.join("\n")))
    }

    async fn find_control(&mut self, _selectors: &[&str]) -> Result<Option<PaginationControl>> {
        Ok(self.page()?.next.as_ref().map(|next| PaginationControl {
            selector: "a.next".to_string(),
            href: Some(next.clone()),
        }))
    }

    async fn activate(&mut self, control: &PaginationControl) -> Result<()> {
        let href = control.href.as_deref().unwrap_or_default();
        self.url = self.url.join(href).map_err(|e| ScoutError::Render {
            url: self.url.to_string(),
            message: e.to_string(),
        })?;
        self.page()?;
        Ok(())
    }

    fn current_url(&self) -> Url {
        self.url.clone()
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub fn crawler_config(budget: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_pages_per_domain: budget,
        batch_pause_ms: 0,
        ..CrawlerConfig::default()
    }
}

pub fn test_config(domains: &[&str], crawler: CrawlerConfig, output_dir: &str) -> Config {
    Config {
        domains: domains.iter().map(|d| d.to_string()).collect(),
        crawler,
        scroll: ScrollConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestScout".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        },
        output: OutputConfig {
            output_dir: output_dir.to_string(),
        },
    }
}
