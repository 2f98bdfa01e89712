//! Browser session abstraction.
//!
//! Defines the [`Session`] trait that the pipeline drives: navigation plus
//! blocking-with-timeout element waits. The production implementation is
//! [`chromium::ChromiumSession`]; tests substitute a scripted fake. The
//! session is an explicit owned handle, never ambient state, so teardown is
//! deterministic on every exit path.

pub mod chromium;

use crate::error::Result;
use crate::markup::ElementQuery;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// How often waits re-probe the page between checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A strategy for locating a single interactive element on the live page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector, for stable known identifiers.
    Css(String),
    /// Any element matched by `selector` whose text contains one of the
    /// synonyms, case-insensitively. Broad, used late in fallback chains.
    Text {
        selector: String,
        synonyms: Vec<String>,
    },
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub fn text(selector: &str, synonyms: &[&str]) -> Self {
        Locator::Text {
            selector: selector.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(sel) => write!(f, "css:{sel}"),
            Locator::Text { selector, synonyms } => {
                write!(f, "text:{selector}~({})", synonyms.join("|"))
            }
        }
    }
}

/// One exclusively-owned browser page for the duration of a run.
///
/// All waits are attempted exactly once per call site; a wait either returns
/// when its condition holds or gives up when its deadline elapses. There is
/// no cancellation once a wait has started.
#[async_trait]
pub trait Session: Send {
    /// Load the page. [`crate::error::Error::Navigation`] on failure — the
    /// only fatal error in the pipeline.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait until at least one element matches `query`, then return the
    /// outer HTML of every match in document order. An elapsed deadline
    /// yields an empty vec, which is a normal result, not an error —
    /// callers decide whether empty is acceptable.
    async fn wait_for_elements(
        &self,
        query: &ElementQuery,
        timeout: Duration,
    ) -> Result<Vec<String>>;

    /// Wait until `locator` resolves to a present, visible, enabled
    /// element. [`crate::error::Error::NotInteractable`] on deadline.
    async fn wait_for_clickable(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Click the element `locator` resolves to.
    /// [`crate::error::Error::NotInteractable`] if nothing clickable matches.
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Release the page and the underlying browser process. Must be called
    /// on every pipeline exit path.
    async fn close(self: Box<Self>) -> Result<()>;
}
