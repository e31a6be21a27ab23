//! Staged in-memory browser used by the page façade tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use waypoint_driver::{Browser, DriverError, ElementQuery};

#[derive(Default)]
struct State {
    title: Mutex<String>,
    url: Mutex<String>,
    url_after_switch: Mutex<Option<String>>,
    switched: AtomicBool,
    elementless: AtomicBool,
    find_seq: AtomicUsize,
    /// Successive DOM snapshots consumed by find_node/find_nodes;
    /// the final entry repeats forever.
    dom_timeline: Mutex<Vec<Vec<usize>>>,
    label_text: Mutex<String>,
    label_switch: Mutex<Option<(usize, String)>>,
    label_reads: AtomicUsize,
    clicks: AtomicUsize,
    extraction_calls: AtomicUsize,
    card_texts: Mutex<Value>,
    window_timeline: Mutex<Vec<Vec<String>>>,
    switched_to: Mutex<Vec<String>>,
}

#[derive(Clone)]
pub(crate) struct FakeBrowser {
    state: Arc<State>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        let state = State::default();
        *state.card_texts.lock().unwrap() = json!([]);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn with_title(self, title: &str) -> Self {
        *self.state.title.lock().unwrap() = title.to_string();
        self
    }

    pub fn with_url(self, url: &str) -> Self {
        *self.state.url.lock().unwrap() = url.to_string();
        self
    }

    pub fn with_url_after_switch(self, url: &str) -> Self {
        *self.state.url_after_switch.lock().unwrap() = Some(url.to_string());
        self
    }

    pub fn without_elements(self) -> Self {
        self.state.elementless.store(true, Ordering::SeqCst);
        self
    }

    pub fn dom_timeline(self, timeline: Vec<Vec<usize>>) -> Self {
        *self.state.dom_timeline.lock().unwrap() = timeline;
        self
    }

    pub fn with_label_text(self, text: &str) -> Self {
        *self.state.label_text.lock().unwrap() = text.to_string();
        self
    }

    pub fn switch_label_after_reads(self, reads: usize, next: &str) -> Self {
        *self.state.label_switch.lock().unwrap() = Some((reads, next.to_string()));
        self
    }

    pub fn with_card_texts(self, texts: Value) -> Self {
        *self.state.card_texts.lock().unwrap() = texts;
        self
    }

    pub fn window_timeline(self, timeline: Vec<Vec<String>>) -> Self {
        *self.state.window_timeline.lock().unwrap() = timeline;
        self
    }

    pub fn clicks(&self) -> usize {
        self.state.clicks.load(Ordering::SeqCst)
    }

    pub fn extraction_calls(&self) -> usize {
        self.state.extraction_calls.load(Ordering::SeqCst)
    }

    pub fn switched_windows(&self) -> Vec<String> {
        self.state.switched_to.lock().unwrap().clone()
    }

    fn advance_dom(&self) -> Option<Vec<usize>> {
        let mut timeline = self.state.dom_timeline.lock().unwrap();
        if timeline.is_empty() {
            None
        } else if timeline.len() > 1 {
            Some(timeline.remove(0))
        } else {
            Some(timeline[0].clone())
        }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Node = usize;
    type Window = String;

    async fn goto(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn find_node(&self, _query: &ElementQuery) -> Result<Option<usize>, DriverError> {
        if self.state.elementless.load(Ordering::SeqCst) {
            return Ok(None);
        }
        if let Some(snapshot) = self.advance_dom() {
            return Ok(snapshot.first().copied());
        }
        Ok(Some(self.state.find_seq.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn find_nodes(&self, _query: &ElementQuery) -> Result<Vec<usize>, DriverError> {
        if self.state.elementless.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        if let Some(snapshot) = self.advance_dom() {
            return Ok(snapshot);
        }
        Ok(vec![1])
    }

    async fn click_node(&self, _node: &usize) -> Result<(), DriverError> {
        self.state.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn script_click(&self, _node: &usize) -> Result<(), DriverError> {
        Ok(())
    }

    async fn scroll_into_view(&self, _node: &usize) -> Result<(), DriverError> {
        Ok(())
    }

    async fn node_text(&self, _node: &usize) -> Result<String, DriverError> {
        let reads = self.state.label_reads.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, next)) = self.state.label_switch.lock().unwrap().clone() {
            if reads > after {
                return Ok(next);
            }
        }
        Ok(self.state.label_text.lock().unwrap().clone())
    }

    async fn is_displayed(&self, _node: &usize) -> Result<bool, DriverError> {
        Ok(true)
    }

    async fn is_enabled(&self, _node: &usize) -> Result<bool, DriverError> {
        Ok(true)
    }

    async fn send_keys(&self, _node: &usize, _text: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn execute_script(&self, src: &str, _args: Vec<Value>) -> Result<Value, DriverError> {
        if src.contains("readyState") {
            return Ok(json!("complete"));
        }
        if src.contains("querySelectorAll") {
            self.state.extraction_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(self.state.card_texts.lock().unwrap().clone());
        }
        Ok(Value::Null)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        if self.state.switched.load(Ordering::SeqCst) {
            if let Some(url) = self.state.url_after_switch.lock().unwrap().clone() {
                return Ok(url);
            }
        }
        Ok(self.state.url.lock().unwrap().clone())
    }

    async fn page_title(&self) -> Result<String, DriverError> {
        Ok(self.state.title.lock().unwrap().clone())
    }

    async fn window_handles(&self) -> Result<Vec<String>, DriverError> {
        let mut timeline = self.state.window_timeline.lock().unwrap();
        if timeline.is_empty() {
            return Ok(vec!["w1".to_string()]);
        }
        if timeline.len() > 1 {
            Ok(timeline.remove(0))
        } else {
            Ok(timeline[0].clone())
        }
    }

    async fn switch_to_window(&self, window: &String) -> Result<(), DriverError> {
        self.state.switched.store(true, Ordering::SeqCst);
        self.state.switched_to.lock().unwrap().push(window.clone());
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(Vec::new())
    }
}
