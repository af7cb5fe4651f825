//! # sepl-core
//!
//! Compiler and sequential executor for SEPL, a small scripting language for
//! browser automation.
//!
//! A script has an optional `DECLARE` section of string variables and a
//! `BEGIN` section of `;`-terminated statements:
//!
//! ```text
//! DECLARE
//!     page := "https://example.com";
//!     title;
//! END
//! BEGIN
//!     GOTO $page;
//!     GET_TEXT css::"h1" INTO $title;
//!     WAIT 2s;
//! END
//! ```
//!
//! [`CompiledScript::compile`] turns source into typed [`Statement`]s and a
//! [`VariableStore`]; [`StatementExecutor`] runs them in order against any
//! [`BrowserDriver`].
//!
//! ## Modules
//!
//! - [`section`] - DECLARE / BEGIN section splitting
//! - [`declare`] - variable declarations
//! - [`tokenizer`] - quote-aware clause tokenization
//! - [`factory`] - statement construction and argument validation
//! - [`compiler`] - the compile pipeline
//! - [`executor`] - statement execution
//! - [`driver`] - the browser capability traits
//! - [`recording`] - in-memory driver that records calls
//! - [`config`] - persistent configuration

pub mod compiler;
pub mod config;
pub mod declare;
pub mod driver;
pub mod error;
pub mod executor;
pub mod factory;
pub mod recording;
pub mod section;
pub mod statement;
pub mod tokenizer;
pub mod variables;

pub use compiler::CompiledScript;
pub use config::SeplConfig;
pub use driver::{BrowserDriver, DriverError, ElementHandle};
pub use error::{SeplError, SyntaxError};
pub use executor::{ExecuteOptions, ExecutionReport, StatementExecutor, StepReport};
pub use statement::{Action, Destination, Location, LocatorKind, Statement, Value};
pub use variables::{VarId, VariableStore};
