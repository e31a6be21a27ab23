//! Job-listing façade: asynchronous filters, content replacement, and the
//! external application redirect.
//!
//! The filter label on this page is driven by an external render pipeline
//! whose completion time is only observable by polling, and applying a
//! filter tears the old result set down before the new one appears, so the
//! page can transiently have zero matching cards.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::json;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use waypoint_driver::{
    Browser, ElementQuery, ElementWaiter, InteractionExecutor, WaitCondition, WaitTimings,
};

use crate::url_or_title_contains;

const SEE_ALL_JOBS: &str = "//a[contains(text(), 'See all QA jobs')]";
const DEPARTMENT_LABEL: &str = "#select2-filter-by-department-container";
const LOCATION_DROPDOWN: &str = "#select2-filter-by-location-container";
const JOB_CARDS: &str = ".position-list-item";
const VIEW_ROLE: &str = "(//a[contains(text(), 'View Role')])[1]";

const ACCESSIBILITY_MARKERS: &[&str] = &["careers", "quality assurance", "open positions"];

/// One script call pulls every card's text; per-node waits would add a
/// round-trip per card for no synchronisation benefit during bulk reads.
const EXTRACT_CARD_TEXTS: &str =
    "return Array.from(document.querySelectorAll(arguments[0])).map(el => el.innerText.trim());";

fn location_option(location: &str) -> ElementQuery {
    ElementQuery::xpath(format!(
        "//li[contains(@class, 'select2-results__option') and contains(text(), '{location}')]"
    ))
}

pub struct JobListingPage<B> {
    browser: B,
    waiter: ElementWaiter<B>,
    executor: InteractionExecutor<B>,
}

impl<B: Browser + Clone> JobListingPage<B> {
    pub fn new(browser: B, timings: WaitTimings) -> Self {
        let waiter = ElementWaiter::new(browser.clone(), timings);
        let executor = InteractionExecutor::new(browser.clone(), timings);
        Self {
            browser,
            waiter,
            executor,
        }
    }

    pub async fn is_accessible(&self) -> bool {
        self.waiter.wait_for_document_ready(None).await;
        url_or_title_contains(&self.browser, ACCESSIBILITY_MARKERS).await
    }

    /// Follow the "see all jobs" link into the filterable listing view.
    pub async fn open_all_jobs(&self) -> Result<()> {
        let link = ElementQuery::xpath(SEE_ALL_JOBS);
        self.executor.scroll_to(&link).await;
        if !self
            .executor
            .click_with_fallback(&link, None)
            .await
            .succeeded()
        {
            bail!("'See all jobs' link could not be clicked");
        }
        self.waiter.wait_for_document_ready(None).await;
        Ok(())
    }

    /// Wait (bounded by `max_attempts`) for the department label to settle on
    /// `expected_label`, then select `location` from the location filter.
    ///
    /// Each retry re-issues the full text wait rather than assuming prior
    /// state survived: the label is replaced asynchronously and a match seen
    /// during a failed attempt says nothing about the next one.
    pub async fn select_filter_if_label_matches(
        &self,
        expected_label: &str,
        location: &str,
        max_attempts: u32,
    ) -> bool {
        let label = ElementQuery::css(DEPARTMENT_LABEL);
        for attempt in 1..=max_attempts {
            if self
                .waiter
                .wait_for(
                    &label,
                    &WaitCondition::TextEquals(expected_label.to_string()),
                    None,
                )
                .await
                .timed_out()
            {
                warn!(attempt, expected_label, "department label has not settled");
                continue;
            }

            let dropdown = ElementQuery::css(LOCATION_DROPDOWN);
            if !self
                .executor
                .click_with_fallback(&dropdown, None)
                .await
                .succeeded()
            {
                warn!(attempt, "location dropdown could not be opened");
                continue;
            }

            let option = location_option(location);
            if self
                .executor
                .click_with_fallback(&option, None)
                .await
                .succeeded()
            {
                info!(location, "location filter applied");
                return true;
            }
            warn!(attempt, location, "location option could not be selected");
        }
        false
    }

    /// Two-phase wait for the filtered result set: the old cards must become
    /// invisible before at least one new card is awaited. "Old gone" and
    /// "new present" are not atomic; the page can transiently match nothing.
    pub async fn wait_for_content_replacement(&self) -> bool {
        let cards = ElementQuery::css(JOB_CARDS);
        if !self.waiter.wait_until_gone(&cards, None).await {
            warn!("old job cards never left the page");
            return false;
        }
        debug!("old job cards gone, waiting for replacements");
        !self
            .waiter
            .wait_for(&cards, &WaitCondition::Present, None)
            .await
            .timed_out()
    }

    /// Read every card's text in one script call and check that at least one
    /// listing contains all required substrings, case-insensitively.
    pub async fn extract_and_validate_listings(&self, required: &[String]) -> Result<bool> {
        let value = self
            .browser
            .execute_script(EXTRACT_CARD_TEXTS, vec![json!(JOB_CARDS)])
            .await?;
        let texts: Vec<String> =
            serde_json::from_value(value).context("card extraction script returned a non-list")?;
        info!(cards = texts.len(), "extracted job cards");
        Ok(any_listing_matches(&texts, required))
    }

    /// Click the first view-role control and confirm the application page it
    /// opens (new window or same tab) carries the expected URL marker.
    pub async fn verify_external_redirect(&self, marker: &str) -> Result<bool> {
        let before = self.browser.window_handles().await?;

        let view_role = ElementQuery::xpath(VIEW_ROLE);
        self.executor.scroll_to(&view_role).await;
        if !self
            .executor
            .click_with_fallback(&view_role, None)
            .await
            .succeeded()
        {
            bail!("view-role control could not be clicked");
        }

        if let Some(new_window) = self.wait_for_new_window(&before).await {
            self.browser.switch_to_window(&new_window).await?;
        }
        self.waiter.wait_for_document_ready(None).await;

        let url = self.browser.current_url().await?;
        let matched = url.to_lowercase().contains(&marker.to_lowercase());
        info!(%url, marker, matched, "external redirect checked");
        Ok(matched)
    }

    async fn wait_for_new_window(&self, before: &[B::Window]) -> Option<B::Window> {
        let timings = self.waiter.timings();
        let deadline = Instant::now() + timings.default_timeout;
        loop {
            if let Ok(handles) = self.browser.window_handles().await {
                if let Some(new) = handles.into_iter().find(|h| !before.contains(h)) {
                    return Some(new);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                debug!("no new window appeared, redirect may use the same tab");
                return None;
            }
            sleep_until(deadline.min(now + timings.poll_interval)).await;
        }
    }
}

/// True iff at least one listing text contains every required substring,
/// case-insensitively. Zero listings never match.
pub fn any_listing_matches(texts: &[String], required: &[String]) -> bool {
    texts.iter().any(|text| {
        let lower = text.to_lowercase();
        required.iter().all(|term| lower.contains(&term.to_lowercase()))
    })
}
