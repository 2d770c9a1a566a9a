use crate::state::CrawlPhase;
use crate::url::{belongs_to_domain, domain_root, normalize, with_trailing_slash};
use crate::{ScoutError, UrlResult};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Per-domain crawl state: the frontier plus everything needed to dedup it
///
/// One instance exists per domain and it is only ever mutated by that
/// domain's orchestrator, so it needs no locking.
///
/// # Invariants
///
/// - every stored URL is canonical (see [`normalize`])
/// - `visited ⊆ ever_enqueued`
/// - `products` and `frontier` are disjoint
/// - `visited.len() <= page_budget`
#[derive(Debug, Clone)]
pub struct DomainCrawlState {
    domain: String,
    page_budget: usize,

    /// Pending URLs, FIFO
    frontier: VecDeque<Url>,

    /// URLs whose traversal has started (marked at dequeue time)
    visited: HashSet<Url>,

    /// URLs ever added to the frontier
    ever_enqueued: HashSet<Url>,

    /// URLs classified as product pages
    products: HashSet<Url>,

    phase: CrawlPhase,
}

impl DomainCrawlState {
    /// Creates an empty, unseeded state for `domain`
    pub fn new(domain: impl Into<String>, page_budget: usize) -> Self {
        Self {
            domain: domain.into(),
            page_budget,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            ever_enqueued: HashSet::new(),
            products: HashSet::new(),
            phase: CrawlPhase::Idle,
        }
    }

    /// Creates a state seeded with the domain's root URL
    pub fn seeded(domain: impl Into<String>, page_budget: usize) -> UrlResult<Self> {
        let mut state = Self::new(domain, page_budget);
        state.seed()?;
        Ok(state)
    }

    /// Resets the state and enqueues `https://{domain}/` as the sole frontier entry
    pub fn seed(&mut self) -> UrlResult<()> {
        let root = domain_root(&self.domain)?;

        self.frontier.clear();
        self.visited.clear();
        self.ever_enqueued.clear();
        self.products.clear();
        self.phase = CrawlPhase::Idle;

        self.ever_enqueued.insert(root.clone());
        self.frontier.push_back(root);
        Ok(())
    }

    /// Appends `url` to the frontier unless it was seen before
    ///
    /// The URL is normalized first. Returns true if the frontier grew.
    /// Calling this again with the same URL is a no-op.
    pub fn enqueue_if_new(&mut self, url: &str) -> bool {
        let canonical = match normalize(url, &self.domain) {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::debug!("Not enqueueing invalid URL {}: {}", url, e);
                return false;
            }
        };

        if self.ever_enqueued.contains(&canonical)
            || self.is_visited(&canonical)
            || self.products.contains(&canonical)
        {
            return false;
        }

        self.ever_enqueued.insert(canonical.clone());
        self.frontier.push_back(canonical);
        true
    }

    /// Removes up to `n` URLs from the front of the frontier
    ///
    /// Already visited URLs (including their trailing-slash variant) are
    /// dropped without being returned. Every returned URL is marked visited
    /// as it is removed. Dequeueing stops early once the page budget is used
    /// up, so fewer than `n` URLs may come back.
    pub fn dequeue_batch(&mut self, n: usize) -> Vec<Url> {
        let mut batch = Vec::with_capacity(n.min(self.frontier.len()));

        while batch.len() < n && self.visited.len() < self.page_budget {
            let Some(url) = self.frontier.pop_front() else {
                break;
            };

            if self.is_visited(&url) {
                continue;
            }

            self.visited.insert(url.clone());
            batch.push(url);
        }

        batch
    }

    /// True while the page budget is not used up and the frontier is non-empty
    pub fn has_capacity(&self) -> bool {
        self.visited.len() < self.page_budget && !self.frontier.is_empty()
    }

    /// Records a product page
    ///
    /// URLs already queued or visited as listings are left alone so products
    /// and frontier stay disjoint. Returns true if the product is new.
    pub fn record_product(&mut self, url: Url) -> bool {
        if self.ever_enqueued.contains(&url) {
            tracing::trace!("{} already tracked as a listing, not recording as product", url);
            return false;
        }
        self.products.insert(url)
    }

    /// Marks a page reached through pagination as visited
    ///
    /// The page is only recorded while the budget allows it and only if it
    /// belongs to this domain; it also counts as enqueued so it will never be
    /// traversed on its own. Returns true if the page was recorded.
    pub fn record_pagination_visit(&mut self, url: &Url) -> bool {
        if !belongs_to_domain(url, &self.domain) {
            tracing::debug!("Ignoring pagination page {} outside {}", url, self.domain);
            return false;
        }
        if self.is_visited(url) || self.visited.len() >= self.page_budget {
            return false;
        }
        self.ever_enqueued.insert(url.clone());
        self.visited.insert(url.clone())
    }

    /// True if `url` or its trailing-slash variant was visited
    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
            || with_trailing_slash(url).map_or(false, |variant| self.visited.contains(&variant))
    }

    /// Moves the crawl to another phase
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), ScoutError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("{}: {} -> {}", self.domain, self.phase, next);
        self.phase = next;
        Ok(())
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Pending URLs in dequeue order
    pub fn frontier(&self) -> impl Iterator<Item = &Url> {
        self.frontier.iter()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn visited(&self) -> &HashSet<Url> {
        &self.visited
    }

    pub fn ever_enqueued(&self) -> &HashSet<Url> {
        &self.ever_enqueued
    }

    pub fn products(&self) -> &HashSet<Url> {
        &self.products
    }

    /// True once the visited count has reached the page budget
    pub fn budget_reached(&self) -> bool {
        self.visited.len() >= self.page_budget
    }
}
