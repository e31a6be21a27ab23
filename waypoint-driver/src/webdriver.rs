//! fantoccini-backed [`Browser`] implementation.

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Value};
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

use crate::browser::Browser;
use crate::error::DriverError;
use crate::query::{By, ElementQuery};

const SCRIPT_CLICK: &str = "arguments[0].click();";
const SCRIPT_SCROLL: &str =
    "arguments[0].scrollIntoView({behavior: 'instant', block: 'center'});";

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// Cloning is cheap; clones share the same underlying session.
#[derive(Clone)]
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Connect to a running WebDriver service (Chromedriver by default on
    /// `http://localhost:9515`).
    pub async fn connect(endpoint: &str, headless: bool) -> Result<Self, DriverError> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(endpoint)
            .await?;

        Ok(Self { client })
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<(), DriverError> {
        self.client.close().await?;
        Ok(())
    }

    fn locator<'a>(query: &'a ElementQuery) -> Locator<'a> {
        match query.by {
            By::Css => Locator::Css(&query.locator),
            By::XPath => Locator::XPath(&query.locator),
            By::Id => Locator::Id(&query.locator),
            By::LinkText => Locator::LinkText(&query.locator),
        }
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Node = Element;
    type Window = WindowHandle;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn find_node(&self, query: &ElementQuery) -> Result<Option<Element>, DriverError> {
        match self.client.find(Self::locator(query)).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_nodes(&self, query: &ElementQuery) -> Result<Vec<Element>, DriverError> {
        Ok(self.client.find_all(Self::locator(query)).await?)
    }

    async fn click_node(&self, node: &Element) -> Result<(), DriverError> {
        node.clone().click().await?;
        Ok(())
    }

    async fn script_click(&self, node: &Element) -> Result<(), DriverError> {
        let arg = serde_json::to_value(node)
            .map_err(|e| DriverError::ScriptShape(e.to_string()))?;
        self.client.execute(SCRIPT_CLICK, vec![arg]).await?;
        Ok(())
    }

    async fn scroll_into_view(&self, node: &Element) -> Result<(), DriverError> {
        let arg = serde_json::to_value(node)
            .map_err(|e| DriverError::ScriptShape(e.to_string()))?;
        self.client.execute(SCRIPT_SCROLL, vec![arg]).await?;
        Ok(())
    }

    async fn node_text(&self, node: &Element) -> Result<String, DriverError> {
        Ok(node.text().await?.trim().to_string())
    }

    async fn is_displayed(&self, node: &Element) -> Result<bool, DriverError> {
        Ok(node.is_displayed().await?)
    }

    async fn is_enabled(&self, node: &Element) -> Result<bool, DriverError> {
        Ok(node.is_enabled().await?)
    }

    async fn send_keys(&self, node: &Element, text: &str) -> Result<(), DriverError> {
        node.send_keys(text).await?;
        Ok(())
    }

    async fn execute_script(&self, src: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        Ok(self.client.execute(src, args).await?)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn page_title(&self) -> Result<String, DriverError> {
        Ok(self.client.title().await?)
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>, DriverError> {
        Ok(self.client.windows().await?)
    }

    async fn switch_to_window(&self, window: &WindowHandle) -> Result<(), DriverError> {
        self.client.switch_to_window(window.clone()).await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.client.screenshot().await?)
    }
}
