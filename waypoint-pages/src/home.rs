//! Landing-page façade: entry point of the journey.

use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;
use waypoint_driver::{Browser, ElementQuery, ElementWaiter, InteractionExecutor, WaitTimings};

use crate::url_or_title_contains;

const COMPANY_MENU: &str = "(//*[@id='navbarDropdownMenuLink'])[5]";
const CAREERS_LINK: &str = "//*[@id='navbarNavDropdown']/ul[1]/li[6]/div/div[2]/a[2]";
const COOKIE_ACCEPT: &str = "wt-cli-accept-all-btn";

const ACCESSIBILITY_MARKERS: &[&str] = &["insider"];

/// How long we give an optional cookie banner to show up before moving on.
const COOKIE_BANNER_BUDGET: Duration = Duration::from_secs(5);

pub struct HomePage<B> {
    browser: B,
    waiter: ElementWaiter<B>,
    executor: InteractionExecutor<B>,
    home_url: String,
}

impl<B: Browser + Clone> HomePage<B> {
    pub fn new(browser: B, timings: WaitTimings, home_url: impl Into<String>) -> Self {
        let waiter = ElementWaiter::new(browser.clone(), timings);
        let executor = InteractionExecutor::new(browser.clone(), timings);
        Self {
            browser,
            waiter,
            executor,
            home_url: home_url.into(),
        }
    }

    /// Navigate to the home page and wait for the document to settle.
    pub async fn open(&self) -> Result<()> {
        self.browser.goto(&self.home_url).await?;
        self.waiter.wait_for_document_ready(None).await;
        Ok(())
    }

    pub async fn is_accessible(&self) -> bool {
        url_or_title_contains(&self.browser, ACCESSIBILITY_MARKERS).await
    }

    /// Dismiss the consent banner if it is shown. Its absence is not a
    /// failure; it may already have been accepted in this session.
    pub async fn accept_cookies(&self) {
        let banner = ElementQuery::id(COOKIE_ACCEPT);
        let result = self
            .executor
            .click_with_fallback(&banner, Some(COOKIE_BANNER_BUDGET))
            .await;
        if result.succeeded() {
            info!("cookie banner accepted");
        } else {
            info!("cookie banner not present, continuing");
        }
    }

    /// Open the company menu and follow the careers link.
    pub async fn navigate_to_careers(&self) -> Result<()> {
        let menu = ElementQuery::xpath(COMPANY_MENU);
        if !self.executor.click_with_fallback(&menu, None).await.succeeded() {
            bail!("company menu could not be opened");
        }

        let link = ElementQuery::xpath(CAREERS_LINK);
        if !self.executor.click_with_fallback(&link, None).await.succeeded() {
            bail!("careers link could not be clicked");
        }

        self.waiter.wait_for_document_ready(None).await;
        Ok(())
    }
}
