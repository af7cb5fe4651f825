//! Compiled statement types.
//!
//! Each [`Statement`] variant carries only the fields its grammar requires:
//! a [`Value`], a [`Location`], a [`Destination`] or a duration. Every type
//! renders back to SEPL source through [`Display`](fmt::Display).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::driver::{BrowserDriver, DriverError, ElementHandle};
use crate::variables::VarId;

/// The leading keyword of a BEGIN clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Goto,
    Click,
    SendKeys,
    GetText,
    GetHtml,
    Wait,
}

impl Action {
    pub fn keyword(&self) -> &'static str {
        match self {
            Action::Goto => "GOTO",
            Action::Click => "CLICK",
            Action::SendKeys => "SEND_KEYS",
            Action::GetText => "GET_TEXT",
            Action::GetHtml => "GET_HTML",
            Action::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Action {
    type Err = ();

    /// Keywords are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GOTO" => Ok(Action::Goto),
            "CLICK" => Ok(Action::Click),
            "SEND_KEYS" => Ok(Action::SendKeys),
            "GET_TEXT" => Ok(Action::GetText),
            "GET_HTML" => Ok(Action::GetHtml),
            "WAIT" => Ok(Action::Wait),
            _ => Err(()),
        }
    }
}

/// A statement input resolved at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    /// A quoted literal with its quotes stripped.
    Plain { text: String },
    /// A `$name` reference and the value the variable held at compile time.
    ///
    /// The snapshot is never re-resolved, even if the variable is written
    /// before this statement runs.
    Var { name: String, snapshot: String },
}

impl Value {
    /// The string the statement will use at run time.
    pub fn resolved(&self) -> &str {
        match self {
            Value::Plain { text } => text,
            Value::Var { snapshot, .. } => snapshot,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Plain { text } => write!(f, "\"{}\"", text),
            Value::Var { name, .. } => write!(f, "${}", name),
        }
    }
}

/// How a [`Location`] selects its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    Xpath,
    Css,
    Text,
}

impl LocatorKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            LocatorKind::Xpath => "xpath",
            LocatorKind::Css => "css",
            LocatorKind::Text => "text",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "xpath" => Some(LocatorKind::Xpath),
            "css" => Some(LocatorKind::Css),
            "text" => Some(LocatorKind::Text),
            _ => None,
        }
    }
}

/// An element-selection descriptor, e.g. `css::"#email"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub kind: LocatorKind,
    pub selector: String,
}

impl Location {
    pub fn new(kind: LocatorKind, selector: impl Into<String>) -> Self {
        Self { kind, selector: selector.into() }
    }

    /// Asks the driver for the element this location describes.
    ///
    /// Lookup happens only here, when the statement executes.
    pub async fn locate(&self, driver: &dyn BrowserDriver) -> Result<Box<dyn ElementHandle>, DriverError> {
        match self.kind {
            LocatorKind::Xpath => driver.find_by_xpath(&self.selector).await,
            LocatorKind::Css => driver.find_by_css(&self.selector).await,
            LocatorKind::Text => driver.find_by_text(&self.selector).await,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::\"{}\"", self.kind.prefix(), self.selector)
    }
}

/// A declared variable a statement writes its result into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub name: String,
    #[serde(skip)]
    pub slot: VarId,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statement {
    Goto {
        value: Value,
    },
    Click {
        location: Location,
    },
    SendKeys {
        location: Location,
        value: Value,
    },
    GetText {
        location: Location,
        destination: Destination,
    },
    GetHtml {
        location: Location,
        destination: Destination,
    },
    Wait {
        millis: u64,
    },
}

impl Statement {
    pub fn action(&self) -> Action {
        match self {
            Statement::Goto { .. } => Action::Goto,
            Statement::Click { .. } => Action::Click,
            Statement::SendKeys { .. } => Action::SendKeys,
            Statement::GetText { .. } => Action::GetText,
            Statement::GetHtml { .. } => Action::GetHtml,
            Statement::Wait { .. } => Action::Wait,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Statement::Goto { value } | Statement::SendKeys { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Statement::Click { location }
            | Statement::SendKeys { location, .. }
            | Statement::GetText { location, .. }
            | Statement::GetHtml { location, .. } => Some(location),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<&Destination> {
        match self {
            Statement::GetText { destination, .. } | Statement::GetHtml { destination, .. } => {
                Some(destination)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = self.action();
        match self {
            Statement::Goto { value } => write!(f, "{} {}", action, value),
            Statement::Click { location } => write!(f, "{} {}", action, location),
            Statement::SendKeys { location, value } => write!(f, "{} {} {}", action, location, value),
            Statement::GetText { location, destination } | Statement::GetHtml { location, destination } => {
                write!(f, "{} {} INTO {}", action, location, destination)
            }
            Statement::Wait { millis } => write!(f, "{} {}ms", action, millis),
        }
    }
}
