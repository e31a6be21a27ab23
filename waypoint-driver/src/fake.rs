//! Scripted in-memory [`Browser`] used by the waiter and executor tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::browser::Browser;
use crate::error::DriverError;
use crate::query::ElementQuery;

const NEVER: usize = usize::MAX;

#[derive(Default)]
struct State {
    finds: AtomicUsize,
    /// Number of `find_node` calls that miss before the element appears.
    appear_after: AtomicUsize,
    displayed: AtomicBool,
    enabled: AtomicBool,
    fail_native: AtomicBool,
    text: Mutex<String>,
    text_switch: Mutex<Option<(usize, String)>>,
    text_reads: AtomicUsize,
    native_clicks: Mutex<Vec<usize>>,
    script_clicks: Mutex<Vec<usize>>,
    typed: Mutex<Vec<(usize, String)>>,
    nodes_timeline: Mutex<Vec<Vec<usize>>>,
    script_result: Mutex<Value>,
    windows: Mutex<Vec<String>>,
    switched_to: Mutex<Vec<String>>,
    screenshot: Mutex<Vec<u8>>,
}

#[derive(Clone)]
pub(crate) struct FakeBrowser {
    state: Arc<State>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        let state = State::default();
        state.displayed.store(true, Ordering::SeqCst);
        state.enabled.store(true, Ordering::SeqCst);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn appear_after_finds(self, misses: usize) -> Self {
        self.state.appear_after.store(misses, Ordering::SeqCst);
        self
    }

    pub fn never_appear(self) -> Self {
        self.state.appear_after.store(NEVER, Ordering::SeqCst);
        self
    }

    pub fn displayed(self, value: bool) -> Self {
        self.state.displayed.store(value, Ordering::SeqCst);
        self
    }

    pub fn fail_native_click(self) -> Self {
        self.state.fail_native.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        *self.state.text.lock().unwrap() = text.to_string();
        self
    }

    /// After `reads` calls to `node_text`, the text flips to `next`.
    pub fn switch_text_after_reads(self, reads: usize, next: &str) -> Self {
        *self.state.text_switch.lock().unwrap() = Some((reads, next.to_string()));
        self
    }

    /// Successive `find_nodes` results; the final entry repeats forever.
    pub fn nodes_timeline(self, timeline: Vec<Vec<usize>>) -> Self {
        *self.state.nodes_timeline.lock().unwrap() = timeline;
        self
    }

    pub fn with_script_result(self, value: Value) -> Self {
        *self.state.script_result.lock().unwrap() = value;
        self
    }

    pub fn text_reads(&self) -> usize {
        self.state.text_reads.load(Ordering::SeqCst)
    }

    pub fn native_clicks(&self) -> Vec<usize> {
        self.state.native_clicks.lock().unwrap().clone()
    }

    pub fn script_clicks(&self) -> Vec<usize> {
        self.state.script_clicks.lock().unwrap().clone()
    }

    pub fn typed(&self) -> Vec<(usize, String)> {
        self.state.typed.lock().unwrap().clone()
    }

    pub fn finds(&self) -> usize {
        self.state.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    // Node ids are the find-sequence number at resolution time, so tests can
    // check that a fallback reused the node instead of re-resolving.
    type Node = usize;
    type Window = String;

    async fn goto(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn find_node(&self, _query: &ElementQuery) -> Result<Option<usize>, DriverError> {
        let seq = self.state.finds.fetch_add(1, Ordering::SeqCst) + 1;
        let misses = self.state.appear_after.load(Ordering::SeqCst);
        if misses == NEVER || seq <= misses {
            return Ok(None);
        }
        Ok(Some(seq))
    }

    async fn find_nodes(&self, _query: &ElementQuery) -> Result<Vec<usize>, DriverError> {
        let mut timeline = self.state.nodes_timeline.lock().unwrap();
        if timeline.len() > 1 {
            Ok(timeline.remove(0))
        } else {
            Ok(timeline.first().cloned().unwrap_or_default())
        }
    }

    async fn click_node(&self, node: &usize) -> Result<(), DriverError> {
        self.state.native_clicks.lock().unwrap().push(*node);
        if self.state.fail_native.load(Ordering::SeqCst) {
            return Err(DriverError::ScriptShape("click intercepted".into()));
        }
        Ok(())
    }

    async fn script_click(&self, node: &usize) -> Result<(), DriverError> {
        self.state.script_clicks.lock().unwrap().push(*node);
        Ok(())
    }

    async fn scroll_into_view(&self, _node: &usize) -> Result<(), DriverError> {
        Ok(())
    }

    async fn node_text(&self, _node: &usize) -> Result<String, DriverError> {
        let reads = self.state.text_reads.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, next)) = self.state.text_switch.lock().unwrap().clone() {
            if reads > after {
                return Ok(next);
            }
        }
        Ok(self.state.text.lock().unwrap().clone())
    }

    async fn is_displayed(&self, _node: &usize) -> Result<bool, DriverError> {
        Ok(self.state.displayed.load(Ordering::SeqCst))
    }

    async fn is_enabled(&self, _node: &usize) -> Result<bool, DriverError> {
        Ok(self.state.enabled.load(Ordering::SeqCst))
    }

    async fn send_keys(&self, node: &usize, text: &str) -> Result<(), DriverError> {
        self.state.typed.lock().unwrap().push((*node, text.to_string()));
        Ok(())
    }

    async fn execute_script(&self, _src: &str, _args: Vec<Value>) -> Result<Value, DriverError> {
        Ok(self.state.script_result.lock().unwrap().clone())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok("https://example.test/".into())
    }

    async fn page_title(&self) -> Result<String, DriverError> {
        Ok("Example".into())
    }

    async fn window_handles(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.state.windows.lock().unwrap().clone())
    }

    async fn switch_to_window(&self, window: &String) -> Result<(), DriverError> {
        self.state.switched_to.lock().unwrap().push(window.clone());
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.state.screenshot.lock().unwrap().clone())
    }
}
