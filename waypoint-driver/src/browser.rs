//! The browser capability trait consumed by the interaction layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DriverError;
use crate::query::ElementQuery;

/// Capability interface over a blocking-per-call browser session.
///
/// The interaction layer never assumes a specific driver; anything that can
/// resolve queries, click nodes, and run scripts is sufficient. Node handles
/// obtained through this trait are scoped to a single synchronous action and
/// discarded afterwards; they must never be stored across a DOM mutation.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Resolved element handle. Valid only until the next DOM mutation.
    type Node: Clone + Send + Sync;
    /// Opaque window/tab identifier.
    type Window: Clone + PartialEq + Send + Sync;

    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Resolve a query to zero or one node. A missing element is `Ok(None)`,
    /// not an error.
    async fn find_node(&self, query: &ElementQuery) -> Result<Option<Self::Node>, DriverError>;

    /// Resolve a query to all matching nodes.
    async fn find_nodes(&self, query: &ElementQuery) -> Result<Vec<Self::Node>, DriverError>;

    /// Native click on a resolved node.
    async fn click_node(&self, node: &Self::Node) -> Result<(), DriverError>;

    /// Script-driven click on a resolved node, used as the fallback when the
    /// native click is rejected (intercepted by an overlay, etc.).
    async fn script_click(&self, node: &Self::Node) -> Result<(), DriverError>;

    async fn scroll_into_view(&self, node: &Self::Node) -> Result<(), DriverError>;

    /// Trimmed visible text of a node.
    async fn node_text(&self, node: &Self::Node) -> Result<String, DriverError>;

    async fn is_displayed(&self, node: &Self::Node) -> Result<bool, DriverError>;

    async fn is_enabled(&self, node: &Self::Node) -> Result<bool, DriverError>;

    async fn send_keys(&self, node: &Self::Node, text: &str) -> Result<(), DriverError>;

    /// Execute a script in the page and return its value.
    async fn execute_script(&self, src: &str, args: Vec<Value>) -> Result<Value, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    async fn page_title(&self) -> Result<String, DriverError>;

    async fn window_handles(&self) -> Result<Vec<Self::Window>, DriverError>;

    async fn switch_to_window(&self, window: &Self::Window) -> Result<(), DriverError>;

    /// PNG capture of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;
}
