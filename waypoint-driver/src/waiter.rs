//! Bounded condition polling against the live DOM.
//!
//! The waiter is the foundation every higher layer calls: it re-resolves the
//! query on each poll (handles are never cached across DOM mutations) and
//! reports a missing element as [`WaitOutcome::TimedOut`] only once the
//! budget is exhausted. "Not found yet" is never an error, and driver
//! hiccups mid-poll (stale references, transient command failures) are
//! absorbed as unsuccessful polls.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::browser::Browser;
use crate::query::ElementQuery;

/// Poll cadence and default budget, supplied at harness construction.
#[derive(Debug, Clone, Copy)]
pub struct WaitTimings {
    pub default_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitTimings {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Condition a wait resolves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// Node exists in the DOM tree (not necessarily visible).
    Present,
    /// Node exists, is displayed, and is enabled.
    Clickable,
    /// Node's trimmed text equals the expected value exactly
    /// (case-sensitive). Used to wait out asynchronous content replacement.
    TextEquals(String),
}

/// Result of a bounded poll.
#[derive(Debug)]
pub enum WaitOutcome<N> {
    Found(N),
    TimedOut,
}

impl<N> WaitOutcome<N> {
    pub fn into_node(self) -> Option<N> {
        match self {
            WaitOutcome::Found(node) => Some(node),
            WaitOutcome::TimedOut => None,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }
}

/// Polls the browser for element state with a bounded timeout.
#[derive(Clone)]
pub struct ElementWaiter<B> {
    browser: B,
    timings: WaitTimings,
}

impl<B: Browser> ElementWaiter<B> {
    pub fn new(browser: B, timings: WaitTimings) -> Self {
        Self { browser, timings }
    }

    pub fn timings(&self) -> WaitTimings {
        self.timings
    }

    /// Poll until `condition` holds for `query` or the budget elapses.
    ///
    /// `timeout` overrides the default budget (shorter for optional
    /// elements, longer for network-bound content). Callers decide whether
    /// `TimedOut` is fatal.
    pub async fn wait_for(
        &self,
        query: &ElementQuery,
        condition: &WaitCondition,
        timeout: Option<Duration>,
    ) -> WaitOutcome<B::Node> {
        let budget = timeout.unwrap_or(self.timings.default_timeout);
        let deadline = Instant::now() + budget;

        loop {
            if let Some(node) = self.poll_once(query, condition).await {
                return WaitOutcome::Found(node);
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(%query, ?condition, budget_ms = budget.as_millis() as u64, "wait timed out");
                return WaitOutcome::TimedOut;
            }
            sleep_until(deadline.min(now + self.timings.poll_interval)).await;
        }
    }

    /// Poll until no displayed node matches `query`, or the budget elapses.
    ///
    /// First phase of a content-replacement wait: the old result set must
    /// disappear before the new one is awaited. A node that has gone stale
    /// counts as gone. Returns false on timeout.
    pub async fn wait_until_gone(&self, query: &ElementQuery, timeout: Option<Duration>) -> bool {
        let budget = timeout.unwrap_or(self.timings.default_timeout);
        let deadline = Instant::now() + budget;

        loop {
            match self.browser.find_nodes(query).await {
                Ok(nodes) => {
                    let mut any_visible = false;
                    for node in &nodes {
                        // A stale handle errors here; that means the old set
                        // is being torn down, which is what we wait for.
                        if matches!(self.browser.is_displayed(node).await, Ok(true)) {
                            any_visible = true;
                            break;
                        }
                    }
                    if !any_visible {
                        return true;
                    }
                }
                Err(e) => {
                    trace!(%query, error = %e, "transient failure while polling for removal");
                }
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(%query, "old content still present at deadline");
                return false;
            }
            sleep_until(deadline.min(now + self.timings.poll_interval)).await;
        }
    }

    /// Poll `document.readyState` until the page reports itself complete.
    pub async fn wait_for_document_ready(&self, timeout: Option<Duration>) -> bool {
        let budget = timeout.unwrap_or(self.timings.default_timeout);
        let deadline = Instant::now() + budget;

        loop {
            match self
                .browser
                .execute_script("return document.readyState;", Vec::new())
                .await
            {
                Ok(value) if value.as_str() == Some("complete") => return true,
                Ok(_) => {}
                Err(e) => {
                    trace!(error = %e, "transient failure while polling readyState");
                }
            }
            let now = Instant::now();
            if now >= deadline {
                debug!("document not ready at deadline");
                return false;
            }
            sleep_until(deadline.min(now + self.timings.poll_interval)).await;
        }
    }

    async fn poll_once(
        &self,
        query: &ElementQuery,
        condition: &WaitCondition,
    ) -> Option<B::Node> {
        let node = match self.browser.find_node(query).await {
            Ok(Some(node)) => node,
            Ok(None) => return None,
            Err(e) => {
                trace!(%query, error = %e, "transient failure while resolving query");
                return None;
            }
        };

        let holds = match condition {
            WaitCondition::Present => true,
            WaitCondition::Clickable => {
                matches!(self.browser.is_displayed(&node).await, Ok(true))
                    && matches!(self.browser.is_enabled(&node).await, Ok(true))
            }
            WaitCondition::TextEquals(expected) => match self.browser.node_text(&node).await {
                Ok(text) => text.trim() == expected,
                Err(e) => {
                    trace!(%query, error = %e, "transient failure while reading text");
                    false
                }
            },
        };

        holds.then_some(node)
    }
}
