//! Scripted probe for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use fieldref_engine::probe::{ElementProbe, ProbeError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockProbe {
    existing: Mutex<HashSet<String>>,
    visible: Mutex<HashSet<String>>,
    counts: Mutex<HashMap<String, usize>>,
    attributes: Mutex<HashMap<(String, String), String>>,
    /// scroll target -> selector that becomes visible once it is scrolled.
    reveal_on_scroll: Mutex<HashMap<String, String>>,
    /// When set, every query fails as if the driver session were gone.
    fail_driver: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visible(self, selector: &str) -> Self {
        self.existing.lock().unwrap().insert(selector.to_string());
        self.visible.lock().unwrap().insert(selector.to_string());
        self
    }

    /// Present in the DOM but not visible.
    pub fn with_existing(self, selector: &str) -> Self {
        self.existing.lock().unwrap().insert(selector.to_string());
        self
    }

    pub fn with_count(self, selector: &str, n: usize) -> Self {
        self.counts.lock().unwrap().insert(selector.to_string(), n);
        self
    }

    pub fn with_attribute(self, selector: &str, name: &str, value: &str) -> Self {
        self.attributes
            .lock()
            .unwrap()
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn reveals_on_scroll(self, scroll_target: &str, selector: &str) -> Self {
        self.reveal_on_scroll
            .lock()
            .unwrap()
            .insert(scroll_target.to_string(), selector.to_string());
        self
    }

    pub fn with_driver_failure(self) -> Self {
        *self.fail_driver.lock().unwrap() = true;
        self
    }

    fn check_driver(&self) -> Result<(), ProbeError> {
        if *self.fail_driver.lock().unwrap() {
            Err(ProbeError::Driver("session gone".into()))
        } else {
            Ok(())
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ElementProbe for MockProbe {
    async fn exists(&self, selector: &str) -> Result<bool, ProbeError> {
        self.record(format!("exists {selector}"));
        self.check_driver()?;
        Ok(self.existing.lock().unwrap().contains(selector))
    }

    async fn visible(&self, selector: &str) -> Result<bool, ProbeError> {
        self.record(format!("visible {selector}"));
        self.check_driver()?;
        Ok(self.visible.lock().unwrap().contains(selector))
    }

    async fn count(&self, selector: &str) -> Result<usize, ProbeError> {
        self.record(format!("count {selector}"));
        self.check_driver()?;
        if let Some(n) = self.counts.lock().unwrap().get(selector) {
            return Ok(*n);
        }
        Ok(usize::from(self.existing.lock().unwrap().contains(selector)))
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<(), ProbeError> {
        self.record(format!("scroll {selector}"));
        if let Some(revealed) = self.reveal_on_scroll.lock().unwrap().get(selector) {
            self.existing.lock().unwrap().insert(revealed.clone());
            self.visible.lock().unwrap().insert(revealed.clone());
        }
        Ok(())
    }

    async fn get_attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, ProbeError> {
        self.record(format!("attr {selector} {name}"));
        Ok(self
            .attributes
            .lock()
            .unwrap()
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }
}
