//! Click/scroll/type actions with automatic fallback strategies.
//!
//! Real pages frequently contain elements that are logically clickable but
//! geometrically obstructed (cookie banners, sticky headers). The two-tier
//! click resolves those without callers special-casing them: a native click
//! first, then exactly one script-driven click on the same resolved node.
//! A node handle is reused only within one action's synchronous retry,
//! never across actions.

use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::Browser;
use crate::query::ElementQuery;
use crate::waiter::{ElementWaiter, WaitCondition, WaitOutcome, WaitTimings};

/// Outcome of an action attempt, carrying the winning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionResult {
    /// The primary strategy worked.
    Succeeded,
    /// The primary strategy failed and the scripted fallback recovered.
    RecoveredViaFallback,
    /// Every strategy failed, or no node could be resolved in time.
    FailedAll,
}

impl InteractionResult {
    pub fn succeeded(&self) -> bool {
        !matches!(self, InteractionResult::FailedAll)
    }
}

/// Performs actions against query-addressed nodes via the waiter.
#[derive(Clone)]
pub struct InteractionExecutor<B> {
    browser: B,
    waiter: ElementWaiter<B>,
}

impl<B: Browser + Clone> InteractionExecutor<B> {
    pub fn new(browser: B, timings: WaitTimings) -> Self {
        let waiter = ElementWaiter::new(browser.clone(), timings);
        Self { browser, waiter }
    }

    /// Wait for clickability, then issue a native click only.
    pub async fn click(&self, query: &ElementQuery) -> InteractionResult {
        let node = match self
            .waiter
            .wait_for(query, &WaitCondition::Clickable, None)
            .await
        {
            WaitOutcome::Found(node) => node,
            WaitOutcome::TimedOut => return InteractionResult::FailedAll,
        };

        match self.browser.click_node(&node).await {
            Ok(()) => InteractionResult::Succeeded,
            Err(e) => {
                warn!(%query, error = %e, "native click failed");
                InteractionResult::FailedAll
            }
        }
    }

    /// Wait for clickability, click natively, and on rejection fall back to
    /// a scripted click on the same resolved node without re-resolving.
    ///
    /// If the clickability wait itself times out the action fails
    /// immediately; there is no fallback without a resolved node.
    pub async fn click_with_fallback(
        &self,
        query: &ElementQuery,
        timeout: Option<Duration>,
    ) -> InteractionResult {
        let node = match self
            .waiter
            .wait_for(query, &WaitCondition::Clickable, timeout)
            .await
        {
            WaitOutcome::Found(node) => node,
            WaitOutcome::TimedOut => return InteractionResult::FailedAll,
        };

        match self.browser.click_node(&node).await {
            Ok(()) => InteractionResult::Succeeded,
            Err(primary) => {
                warn!(%query, error = %primary, "native click rejected, trying scripted click");
                match self.browser.script_click(&node).await {
                    Ok(()) => {
                        debug!(%query, "scripted click recovered the action");
                        InteractionResult::RecoveredViaFallback
                    }
                    Err(fallback) => {
                        warn!(%query, error = %fallback, "scripted click failed as well");
                        InteractionResult::FailedAll
                    }
                }
            }
        }
    }

    /// Wait for presence, then scroll the node into the viewport center.
    pub async fn scroll_to(&self, query: &ElementQuery) -> InteractionResult {
        let node = match self
            .waiter
            .wait_for(query, &WaitCondition::Present, None)
            .await
        {
            WaitOutcome::Found(node) => node,
            WaitOutcome::TimedOut => return InteractionResult::FailedAll,
        };

        match self.browser.scroll_into_view(&node).await {
            Ok(()) => InteractionResult::Succeeded,
            Err(e) => {
                warn!(%query, error = %e, "scroll into view failed");
                InteractionResult::FailedAll
            }
        }
    }

    /// Wait for clickability, then type into the node.
    pub async fn type_text(&self, query: &ElementQuery, text: &str) -> InteractionResult {
        let node = match self
            .waiter
            .wait_for(query, &WaitCondition::Clickable, None)
            .await
        {
            WaitOutcome::Found(node) => node,
            WaitOutcome::TimedOut => return InteractionResult::FailedAll,
        };

        match self.browser.send_keys(&node, text).await {
            Ok(()) => InteractionResult::Succeeded,
            Err(e) => {
                warn!(%query, error = %e, "typing failed");
                InteractionResult::FailedAll
            }
        }
    }
}
