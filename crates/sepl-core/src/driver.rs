//! Browser driver trait consumed by the statement executor.
//!
//! This module defines the [`BrowserDriver`] and [`ElementHandle`] traits,
//! the only surface the compiler and executor need from a browser-automation
//! backend. Constructing a concrete backend (WebDriver, CDP, headless flags,
//! screenshot persistence) is left to the embedding application; the crate
//! ships only the in-memory [`RecordingDriver`](crate::recording::RecordingDriver).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sepl_core::{CompiledScript, ExecuteOptions, StatementExecutor};
//! use sepl_core::recording::RecordingDriver;
//!
//! # async fn demo() -> Result<(), sepl_core::SeplError> {
//! let mut script = CompiledScript::compile("BEGIN\nGOTO \"https://example.com\";\nEND")?;
//! let driver = Arc::new(RecordingDriver::new());
//! StatementExecutor::new(driver, ExecuteOptions::default())
//!     .execute(&mut script)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a browser backend.
#[derive(Error, Debug)]
pub enum DriverError {
    /// No element matched the selector.
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// A command or operation failed with the given message.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The browser session has already been closed.
    #[error("Browser session closed")]
    SessionClosed,

    /// An operation timed out inside the backend.
    #[error("Operation timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A located element on the current page.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn click(&self) -> Result<(), DriverError>;

    /// Types `text` into the element.
    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;

    /// The element's visible text.
    async fn text(&self) -> Result<String, DriverError>;

    /// The element's `innerHTML`.
    async fn inner_html(&self) -> Result<String, DriverError>;
}

/// One browser session.
///
/// Element lookups return an owned handle; implementations decide how long
/// a lookup may block before failing.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Load `url` in the current tab.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    async fn find_by_xpath(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError>;

    async fn find_by_css(&self, selector: &str) -> Result<Box<dyn ElementHandle>, DriverError>;

    /// Find the first element whose own text node equals `text`.
    ///
    /// The default implementation delegates to
    /// [`find_by_xpath`](Self::find_by_xpath) with the expression built by
    /// [`visible_text_xpath`].
    async fn find_by_text(&self, text: &str) -> Result<Box<dyn ElementHandle>, DriverError> {
        self.find_by_xpath(&visible_text_xpath(text)).await
    }

    /// Release the session. Further calls may fail with
    /// [`DriverError::SessionClosed`].
    async fn close(&self) -> Result<(), DriverError>;
}

/// Builds `//*[text()='...']` for `text`, quoting it as an XPath 1.0 literal.
pub fn visible_text_xpath(text: &str) -> String {
    format!("//*[text()={}]", xpath_literal(text))
}

/// XPath 1.0 has no escape sequences, so a text containing both quote kinds
/// has to be stitched together with `concat()`.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }
    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::NoSuchElement("#missing".to_string());
        assert!(err.to_string().contains("#missing"));

        let err = DriverError::CommandFailed("click intercepted".to_string());
        assert!(err.to_string().contains("click intercepted"));

        assert!(DriverError::SessionClosed.to_string().contains("closed"));
        assert!(DriverError::Timeout.to_string().contains("timed out"));
    }

    #[test]
    fn test_visible_text_xpath_plain() {
        assert_eq!(visible_text_xpath("Hello SEPL"), "//*[text()='Hello SEPL']");
    }

    #[test]
    fn test_visible_text_xpath_apostrophe() {
        assert_eq!(visible_text_xpath("What's up?"), r#"//*[text()="What's up?"]"#);
    }

    #[test]
    fn test_visible_text_xpath_both_quotes() {
        assert_eq!(
            visible_text_xpath(r#"it's "x""#),
            r#"//*[text()=concat('it', "'", 's "x"')]"#
        );
    }
}
