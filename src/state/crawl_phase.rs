/// Crawl phase definitions for a single domain
///
/// A domain moves `Idle → Running → (Exhausted | BudgetReached) → Done`.
/// A domain whose crawl fails may jump straight to `Done` from any
/// non-terminal phase, keeping whatever it collected so far.
use std::fmt;

/// Represents where a domain is in its crawl lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Registered and seeded, no batch dispatched yet
    Idle,

    /// Batches are being dequeued and traversed
    Running,

    /// The frontier ran dry before the page budget was used up
    Exhausted,

    /// The page budget was used up
    BudgetReached,

    /// Crawl finished; state is read-only from here on
    Done,
}

impl CrawlPhase {
    /// Returns true if a transition from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Exhausted)
                | (Running, BudgetReached)
                | (Exhausted, Done)
                | (BudgetReached, Done)
                | (Idle, Done)
                | (Running, Done)
        )
    }

    /// Returns true once the domain's crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Exhausted => "exhausted",
            Self::BudgetReached => "budget_reached",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
