//! Page traversal engine
//!
//! One traversal is a full logical visit to a starting URL: render it, scroll
//! to trigger lazy loading, harvest links, then keep activating the "next
//! page" control until there is none. Links are accumulated across every
//! page of the chain.

use crate::config::{Config, ScrollConfig};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::renderer::{RenderSession, Renderer, NEXT_PAGE_SELECTORS};
use crate::url::{belongs_to_domain, normalize, LinkClass, LinkClassifier};
use crate::{Result, ScoutError};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Limits applied to every traversal
#[derive(Debug, Clone)]
pub struct TraversalSettings {
    /// Upper bound on each render or navigation wait
    pub navigation_timeout: Duration,

    /// Maximum number of "next" activations per traversal
    pub max_pagination_steps: u32,

    pub scroll: ScrollConfig,
}

impl TraversalSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            navigation_timeout: config.crawler.navigation_timeout(),
            max_pagination_steps: config.crawler.max_pagination_steps,
            scroll: config.scroll.clone(),
        }
    }
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(60),
            max_pagination_steps: 50,
            scroll: ScrollConfig::default(),
        }
    }
}

/// What a traversal found
#[derive(Debug)]
pub struct TraversalOutcome {
    /// The starting URL
    pub url: Url,

    /// Listing candidates, in discovery order, without duplicates
    pub listing_links: Vec<Url>,

    /// Product pages seen on any rendered page
    pub products: Vec<Url>,

    /// Pages reached by activating "next" controls, in order
    pub pages: Vec<Url>,

    /// Set when the traversal was aborted
    pub error: Option<ScoutError>,
}

impl TraversalOutcome {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            listing_links: Vec::new(),
            products: Vec::new(),
            pages: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Aborts the outcome: listing links are dropped, products and pages kept
    pub fn fail(&mut self, error: ScoutError) {
        self.listing_links.clear();
        self.error = Some(error);
    }

    /// Folds a later attempt at the same URL into this outcome
    ///
    /// Products and pages accumulate; links and error come from `later`.
    pub fn absorb(&mut self, later: TraversalOutcome) {
        self.products.extend(later.products);
        self.pages.extend(later.pages);
        self.listing_links = later.listing_links;
        self.error = later.error;
    }

    fn add_listing(&mut self, url: Url) {
        if !self.listing_links.contains(&url) {
            self.listing_links.push(url);
        }
    }

    fn add_product(&mut self, url: Url) {
        if !self.products.contains(&url) {
            self.products.push(url);
        }
    }
}

/// Runs traversals against a renderer
pub struct TraversalEngine<R> {
    renderer: Arc<R>,
    classifier: Arc<LinkClassifier>,
    settings: TraversalSettings,
}

impl<R: Renderer> TraversalEngine<R> {
    pub fn new(renderer: Arc<R>, classifier: Arc<LinkClassifier>, settings: TraversalSettings) -> Self {
        Self {
            renderer,
            classifier,
            settings,
        }
    }

    /// Performs one traversal starting at `url`
    ///
    /// Any failure while rendering, scrolling or navigating aborts the whole
    /// traversal; the outcome then carries the error and no listing links.
    /// The render session is closed on every path.
    pub async fn traverse(&self, url: &Url, domain: &str) -> TraversalOutcome {
        let mut outcome = TraversalOutcome::new(url.clone());

        let mut session = match self.bounded(url, self.renderer.open(url)).await {
            Ok(session) => session,
            Err(e) => {
                outcome.fail(e);
                return outcome;
            }
        };

        let result = self.paginate(&mut session, domain, &mut outcome).await;
        session.close().await;

        if let Err(e) = result {
            outcome.fail(e);
        }
        outcome
    }

    /// Harvests the opened page, then follows "next" controls
    ///
    /// Every page state reached is harvested before deciding whether to go on.
    /// A page state is the landed URL, query included, plus a fingerprint of
    /// its markup, so `?page=N` links and in-place "load more" buttons both
    /// count as progress. Pagination stops on a repeated state, on a landing
    /// outside `domain`, or after `max_pagination_steps` activations.
    async fn paginate(
        &self,
        session: &mut R::Session,
        domain: &str,
        outcome: &mut TraversalOutcome,
    ) -> Result<()> {
        let mut current = outcome.url.clone();
        let fingerprint = self.harvest(session, &current, domain, outcome).await?;
        let mut seen = HashSet::from([(current.clone(), fingerprint)]);
        let mut steps = 0;

        loop {
            if steps >= self.settings.max_pagination_steps {
                tracing::debug!(
                    "Stopping pagination of {} after {} pages",
                    outcome.url,
                    steps
                );
                break;
            }

            let control = self
                .bounded(&current, session.find_control(NEXT_PAGE_SELECTORS))
                .await?;
            let Some(control) = control else {
                break;
            };

            tracing::debug!("Found '{}' control on {}, following it", control.selector, current);
            self.bounded(&current, session.activate(&control)).await?;
            steps += 1;

            let mut landed = session.current_url();
            landed.set_fragment(None);
            if !belongs_to_domain(&landed, domain) {
                tracing::debug!("Pagination of {} left {} for {}", outcome.url, domain, landed);
                break;
            }
            current = landed;

            let fingerprint = self.harvest(session, &current, domain, outcome).await?;
            if !seen.insert((current.clone(), fingerprint)) {
                tracing::debug!("Pagination of {} looped back to {}", outcome.url, current);
                break;
            }

            let page = normalize(current.as_str(), domain)?;
            if page != outcome.url && !outcome.pages.contains(&page) {
                outcome.pages.push(page);
            }
        }

        Ok(())
    }

    /// Scrolls the current page and collects its links
    ///
    /// Returns a fingerprint of the rendered markup.
    async fn harvest(
        &self,
        session: &mut R::Session,
        url: &Url,
        domain: &str,
        outcome: &mut TraversalOutcome,
    ) -> Result<String> {
        self.bounded(url, self.scroll_page(session)).await?;
        let html = self.bounded(url, session.content()).await?;
        self.collect_links(&html, domain, outcome);

        let mut hasher = Sha256::new();
        hasher.update(html.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Scrolls down in fixed increments until the document height or the
    /// distance cap is reached. Returns the number of increments performed.
    async fn scroll_page(&self, session: &mut R::Session) -> Result<u32> {
        let scroll = &self.settings.scroll;
        let mut scrolled = 0u32;
        let mut increments = 0;

        loop {
            let height = session.scroll_height().await?;
            if scrolled >= height || scrolled >= scroll.max_distance_px {
                break;
            }

            session.scroll_by(scroll.step_px).await?;
            scrolled = scrolled.saturating_add(scroll.step_px);
            increments += 1;
            tokio::time::sleep(scroll.interval()).await;
        }

        Ok(increments)
    }

    /// Normalizes, scopes and classifies every link of a rendered page
    fn collect_links(&self, html: &str, domain: &str, outcome: &mut TraversalOutcome) {
        for href in extract_hrefs(html) {
            let url = match normalize(&href, domain) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping invalid href {}: {}", href, e);
                    continue;
                }
            };

            if !belongs_to_domain(&url, domain) {
                tracing::trace!("Skipping off-domain link {}", url);
                continue;
            }

            let class = self.classifier.classify(url.as_str());
            tracing::trace!("{} -> {}", url, class);
            match class {
                LinkClass::Product => outcome.add_product(url),
                LinkClass::ListingCandidate => outcome.add_listing(url),
                LinkClass::Excluded => {}
            }
        }
    }

    /// Bounds a render or navigation wait by the navigation timeout
    async fn bounded<T, F>(&self, url: &Url, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.settings.navigation_timeout;
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(ScoutError::Timeout {
                url: url.to_string(),
                after: limit,
            }),
        }
    }
}
