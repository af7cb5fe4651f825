//! An in-memory [`BrowserDriver`] that records every call it receives.
//!
//! Every selector resolves to an element unless it was registered with
//! [`RecordingDriver::missing`]. Element text and HTML default to the empty
//! string and can be preset per selector. Used by the `trace` command and by
//! tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;

use crate::driver::{BrowserDriver, DriverError, ElementHandle};
use crate::statement::LocatorKind;

/// One call observed by a [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DriverCall {
    Navigate { url: String },
    Find { kind: LocatorKind, selector: String },
    Click { selector: String },
    SendKeys { selector: String, text: String },
    GetText { selector: String },
    GetInnerHtml { selector: String },
    Close,
}

impl DriverCall {
    /// Lookups and `Close` are bookkeeping; everything else touches the page.
    pub fn is_interaction(&self) -> bool {
        !matches!(self, DriverCall::Find { .. } | DriverCall::Close)
    }
}

#[derive(Default)]
struct State {
    calls: Vec<DriverCall>,
    closed: bool,
    text: HashMap<String, String>,
    html: HashMap<String, String>,
    missing: HashSet<String>,
    fail_close: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: DriverCall) -> Result<MutexGuard<'_, State>, DriverError> {
        let mut state = self.lock();
        if state.closed {
            return Err(DriverError::SessionClosed);
        }
        state.calls.push(call);
        Ok(state)
    }
}

/// Builder-configured fake browser session.
///
/// Builder methods may be called at any time, including after lookups;
/// they take effect for every later call.
#[derive(Default)]
pub struct RecordingDriver {
    shared: Arc<Shared>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn configure(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.shared.lock());
        self
    }

    /// Text returned by elements matching `selector`.
    pub fn with_text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        let (selector, text) = (selector.into(), text.into());
        self.configure(|s| {
            s.text.insert(selector, text);
        })
    }

    /// HTML returned by elements matching `selector`.
    pub fn with_html(self, selector: impl Into<String>, html: impl Into<String>) -> Self {
        let (selector, html) = (selector.into(), html.into());
        self.configure(|s| {
            s.html.insert(selector, html);
        })
    }

    /// Lookups of `selector` fail with [`DriverError::NoSuchElement`].
    pub fn missing(self, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        self.configure(|s| {
            s.missing.insert(selector);
        })
    }

    /// `close()` fails with [`DriverError::CommandFailed`].
    pub fn failing_close(self) -> Self {
        self.configure(|s| s.fail_close = true)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.shared.lock().calls.clone()
    }

    /// Calls that touched the page, without lookups or `Close`.
    pub fn interactions(&self) -> Vec<DriverCall> {
        self.calls().into_iter().filter(DriverCall::is_interaction).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    fn find(&self, kind: LocatorKind, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        let state = self.shared.record(DriverCall::Find { kind, selector: selector.to_string() })?;
        if state.missing.contains(selector) {
            return Err(DriverError::NoSuchElement(selector.to_string()));
        }
        Ok(Box::new(RecordedElement {
            shared: Arc::clone(&self.shared),
            selector: selector.to_string(),
        }))
    }
}

#[async_trait]
impl BrowserDriver for RecordingDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.shared.record(DriverCall::Navigate { url: url.to_string() })?;
        Ok(())
    }

    async fn find_by_xpath(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.find(LocatorKind::Xpath, selector)
    }

    async fn find_by_css(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.find(LocatorKind::Css, selector)
    }

    async fn find_by_text(&self, text: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.find(LocatorKind::Text, text)
    }

    async fn close(&self) -> Result<(), DriverError> {
        let mut state = self.shared.lock();
        if state.closed {
            return Err(DriverError::SessionClosed);
        }
        state.calls.push(DriverCall::Close);
        state.closed = true;
        if state.fail_close {
            return Err(DriverError::CommandFailed("close refused".to_string()));
        }
        Ok(())
    }
}

struct RecordedElement {
    shared: Arc<Shared>,
    selector: String,
}

#[async_trait]
impl ElementHandle for RecordedElement {
    async fn click(&self) -> Result<(), DriverError> {
        self.shared.record(DriverCall::Click { selector: self.selector.clone() })?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.shared.record(DriverCall::SendKeys {
            selector: self.selector.clone(),
            text: text.to_string(),
        })?;
        Ok(())
    }

    async fn text(&self) -> Result<String, DriverError> {
        let state = self.shared.record(DriverCall::GetText { selector: self.selector.clone() })?;
        Ok(state.text.get(&self.selector).cloned().unwrap_or_default())
    }

    async fn inner_html(&self) -> Result<String, DriverError> {
        let state = self.shared.record(DriverCall::GetInnerHtml { selector: self.selector.clone() })?;
        Ok(state.html.get(&self.selector).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let driver = RecordingDriver::new().with_text("#a", "hello");
        driver.navigate("https://example.com").await.unwrap();
        let el = driver.find_by_css("#a").await.unwrap();
        assert_eq!(el.text().await.unwrap(), "hello");
        el.click().await.unwrap();

        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::Navigate { url: "https://example.com".to_string() },
                DriverCall::Find { kind: LocatorKind::Css, selector: "#a".to_string() },
                DriverCall::GetText { selector: "#a".to_string() },
                DriverCall::Click { selector: "#a".to_string() },
            ]
        );
        assert_eq!(driver.interactions().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_selector() {
        let driver = RecordingDriver::new().missing("//nope");
        let err = driver.find_by_xpath("//nope").await.err().unwrap();
        assert!(matches!(err, DriverError::NoSuchElement(s) if s == "//nope"));
    }

    #[tokio::test]
    async fn test_unset_html_is_empty() {
        let driver = RecordingDriver::new().with_html("p", "<b>x</b>");
        let el = driver.find_by_text("Sign in").await.unwrap();
        assert_eq!(el.inner_html().await.unwrap(), "");
        let el = driver.find_by_css("p").await.unwrap();
        assert_eq!(el.inner_html().await.unwrap(), "<b>x</b>");
    }

    #[tokio::test]
    async fn test_configuration_after_lookup_applies() {
        let driver = RecordingDriver::new();
        let held = driver.find_by_css("#a").await.unwrap();
        let driver = driver.with_text("#a", "hello").missing("#b").failing_close();

        assert_eq!(held.text().await.unwrap(), "hello");
        let el = driver.find_by_css("#a").await.unwrap();
        assert_eq!(el.text().await.unwrap(), "hello");
        assert!(matches!(driver.find_by_css("#b").await, Err(DriverError::NoSuchElement(_))));
        assert!(matches!(driver.close().await, Err(DriverError::CommandFailed(_))));
    }

    #[tokio::test]
    async fn test_closed_session_rejects_calls() {
        let driver = RecordingDriver::new();
        let el = driver.find_by_css("a").await.unwrap();
        driver.close().await.unwrap();
        assert!(driver.is_closed());
        assert!(matches!(el.click().await, Err(DriverError::SessionClosed)));
        assert!(matches!(driver.navigate("u").await, Err(DriverError::SessionClosed)));
        assert!(matches!(driver.close().await, Err(DriverError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_failing_close_still_closes() {
        let driver = RecordingDriver::new().failing_close();
        assert!(matches!(driver.close().await, Err(DriverError::CommandFailed(_))));
        assert!(driver.is_closed());
        assert_eq!(driver.calls(), vec![DriverCall::Close]);
    }

    #[test]
    fn test_call_serializes_with_tag() {
        let json = serde_json::to_value(DriverCall::Find {
            kind: LocatorKind::Text,
            selector: "Go".to_string(),
        })
        .unwrap();
        assert_eq!(json["call"], "find");
        assert_eq!(json["kind"], "text");
    }
}
