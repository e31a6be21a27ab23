//! Careers-page façade: section checks and the hop into the team listing.

use anyhow::{bail, Result};
use tracing::{info, warn};
use waypoint_driver::{
    Browser, ElementQuery, ElementWaiter, InteractionExecutor, WaitCondition, WaitTimings,
};

use crate::url_or_title_contains;

const LOCATIONS_BLOCK: &str = "//*[@id='career-our-location']/div/div/div/div[1]";
const TEAMS_BLOCK: &str = "//*[@id='career-find-our-calling']/div/div/a";
const LIFE_BLOCK: &str = "//h2[contains(text(), 'Life at Insider')]";
const SEE_ALL_TEAMS: &str = "//a[contains(text(), 'See all teams')]";
const TEAM_HEADING: &str = "//h3[contains(text(), 'Quality Assurance')]";
const OPEN_POSITIONS_LINK: &str =
    "//h3[contains(text(), 'Quality Assurance')]/following-sibling::a[contains(text(), 'Open Positions')]";
const LISTING_MARKER: &str = "//a[contains(text(), 'See all QA jobs')]";

const ACCESSIBILITY_MARKERS: &[&str] = &["careers", "quality assurance"];

pub struct CareersPage<B> {
    browser: B,
    waiter: ElementWaiter<B>,
    executor: InteractionExecutor<B>,
}

impl<B: Browser + Clone> CareersPage<B> {
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

    /// The locations, teams, and culture blocks must all be present.
    pub async fn verify_sections(&self) -> bool {
        for locator in [LOCATIONS_BLOCK, TEAMS_BLOCK, LIFE_BLOCK] {
            let query = ElementQuery::xpath(locator);
            if self
                .waiter
                .wait_for(&query, &WaitCondition::Present, None)
                .await
                .timed_out()
            {
                warn!(%query, "careers section missing");
                return false;
            }
        }
        true
    }

    /// Scroll to "See all teams", open the team overview, and follow the
    /// team's open-positions link into the job listing page.
    pub async fn open_team_listing(&self) -> Result<()> {
        let see_all = ElementQuery::xpath(SEE_ALL_TEAMS);
        self.executor.scroll_to(&see_all).await;
        if !self
            .executor
            .click_with_fallback(&see_all, None)
            .await
            .succeeded()
        {
            bail!("'See all teams' could not be clicked");
        }
        self.waiter.wait_for_document_ready(None).await;

        let heading = ElementQuery::xpath(TEAM_HEADING);
        self.executor.scroll_to(&heading).await;

        let open_positions = ElementQuery::xpath(OPEN_POSITIONS_LINK);
        if !self
            .executor
            .click_with_fallback(&open_positions, None)
            .await
            .succeeded()
        {
            bail!("team open-positions link could not be clicked");
        }

        let marker = ElementQuery::xpath(LISTING_MARKER);
        if self
            .waiter
            .wait_for(&marker, &WaitCondition::Present, None)
            .await
            .timed_out()
        {
            bail!("job listing page did not load after following the team link");
        }
        info!("team listing reached");
        Ok(())
    }
}
