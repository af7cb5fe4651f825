//! Shared test helpers for sepl-core integration tests.
//!
//! Provides a programmable [`StubDriver`] whose elements can be told to
//! fail, plus a one-call helper that compiles and runs a script.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sepl_core::driver::{BrowserDriver, DriverError, ElementHandle};
use sepl_core::{CompiledScript, ExecuteOptions, ExecutionReport, SeplError, StatementExecutor};

/// What an element matching a selector does when used.
#[derive(Clone)]
pub enum StubBehavior {
    /// Resolves; `text()` and `inner_html()` return these strings.
    Element { text: String, html: String },
    /// Lookup fails with `NoSuchElement`.
    Missing,
    /// Resolves, but every interaction fails with `CommandFailed`.
    Broken(String),
}

/// A driver that logs every call as a short string, e.g. `"click #a"`.
#[derive(Default)]
pub struct StubDriver {
    behaviors: HashMap<String, StubBehavior>,
    log: Arc<Mutex<Vec<String>>>,
    navigate_error: Option<String>,
}

impl StubDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, selector: &str, text: &str, html: &str) -> Self {
        self.behaviors.insert(
            selector.to_string(),
            StubBehavior::Element { text: text.to_string(), html: html.to_string() },
        );
        self
    }

    pub fn behavior(mut self, selector: &str, behavior: StubBehavior) -> Self {
        self.behaviors.insert(selector.to_string(), behavior);
        self
    }

    pub fn failing_navigation(mut self, message: &str) -> Self {
        self.navigate_error = Some(message.to_string());
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn lookup(&self, kind: &str, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.push(format!("find {kind} {selector}"));
        let behavior = self
            .behaviors
            .get(selector)
            .cloned()
            .unwrap_or(StubBehavior::Element { text: String::new(), html: String::new() });
        if let StubBehavior::Missing = behavior {
            return Err(DriverError::NoSuchElement(selector.to_string()));
        }
        Ok(Box::new(StubElement {
            selector: selector.to_string(),
            behavior,
            log: Arc::clone(&self.log),
        }))
    }
}

#[async_trait]
impl BrowserDriver for StubDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.push(format!("navigate {url}"));
        match &self.navigate_error {
            Some(msg) => Err(DriverError::CommandFailed(msg.clone())),
            None => Ok(()),
        }
    }

    async fn find_by_xpath(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.lookup("xpath", selector)
    }

    async fn find_by_css(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.lookup("css", selector)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.push("close".to_string());
        Ok(())
    }
}

struct StubElement {
    selector: String,
    behavior: StubBehavior,
    log: Arc<Mutex<Vec<String>>>,
}

impl StubElement {
    fn touch(&self, what: String) -> Result<(), DriverError> {
        self.log.lock().unwrap().push(what);
        match &self.behavior {
            StubBehavior::Broken(msg) => Err(DriverError::CommandFailed(msg.clone())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ElementHandle for StubElement {
    async fn click(&self) -> Result<(), DriverError> {
        self.touch(format!("click {}", self.selector))
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.touch(format!("send_keys {} {}", self.selector, text))
    }

    async fn text(&self) -> Result<String, DriverError> {
        self.touch(format!("text {}", self.selector))?;
        match &self.behavior {
            StubBehavior::Element { text, .. } => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn inner_html(&self) -> Result<String, DriverError> {
        self.touch(format!("html {}", self.selector))?;
        match &self.behavior {
            StubBehavior::Element { html, .. } => Ok(html.clone()),
            _ => Ok(String::new()),
        }
    }
}

/// Compiles `source` and runs it against `driver`, returning the script so
/// its variables can be inspected.
pub async fn compile_and_run(
    source: &str,
    driver: Arc<dyn BrowserDriver>,
    options: ExecuteOptions,
) -> (Result<ExecutionReport, SeplError>, CompiledScript) {
    let mut script = CompiledScript::compile(source).unwrap();
    let result = StatementExecutor::new(driver, options).execute(&mut script).await;
    (result, script)
}
