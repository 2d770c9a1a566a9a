//! Renderer capability
//!
//! A renderer loads a URL into a session that exposes the rendered document
//! and its interactive controls. Headless browsers, plain HTTP fetchers and
//! scripted test doubles all plug in behind these two traits.

use crate::Result;
use async_trait::async_trait;
use url::Url;

/// Selectors tried, in order, when looking for a "next page" control
pub const NEXT_PAGE_SELECTORS: &[&str] = &[
    "a.next",
    "button.next",
    ".next",
    ".pagination-next",
    "a.next-page",
];

/// An interactive control found in a rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControl {
    /// The selector that matched
    pub selector: String,

    /// Link target, when the control is an anchor
    pub href: Option<String>,
}

/// Opens rendering sessions
#[async_trait]
pub trait Renderer: Send + Sync {
    type Session: RenderSession;

    /// Loads `url` and waits until the document is interactive
    async fn open(&self, url: &Url) -> Result<Self::Session>;
}

/// A single rendered page, exclusively owned by the traversal that opened it
#[async_trait]
pub trait RenderSession: Send {
    /// Scrollable height of the document, in pixels
    async fn scroll_height(&mut self) -> Result<u32>;

    /// Scrolls the viewport down by `px` pixels
    async fn scroll_by(&mut self, px: u32) -> Result<()>;

    /// Serialized markup of the current document
    async fn content(&mut self) -> Result<String>;

    /// First control matching one of `selectors`, tried in order
    async fn find_control(&mut self, selectors: &[&str]) -> Result<Option<PaginationControl>>;

    /// Activates `control` and waits for the resulting navigation to finish
    async fn activate(&mut self, control: &PaginationControl) -> Result<()>;

    /// URL of the document currently shown
    fn current_url(&self) -> Url;

    /// Releases the session
    ///
    /// Must be idempotent and safe to call after any earlier failure.
    async fn close(&mut self);
}
