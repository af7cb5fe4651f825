//! Error types for compiling and executing SEPL scripts.
//!
//! Compilation fails fast with a [`SyntaxError`], wrapped in [`SeplError`]
//! together with the clause it came from. Execution failures carry the
//! [`DriverError`] reported by the browser backend and the index of the
//! statement that triggered it.

use thiserror::Error;

use crate::driver::DriverError;
use crate::statement::Action;

/// A malformed section, declaration or statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The first non-empty line is neither `DECLARE` nor `BEGIN`.
    #[error("missing leading section keyword: script must start with DECLARE or BEGIN, found '{0}'")]
    MissingSectionKeyword(String),

    /// The DECLARE block is not followed by a BEGIN block.
    #[error("missing BEGIN section after DECLARE ... END")]
    MissingProcedureSection,

    /// A section has no closing `END` line.
    #[error("unterminated section: {0} must be closed by END")]
    UnterminatedSection(&'static str),

    /// The BEGIN block contains no lines.
    #[error("empty procedure section")]
    EmptyProcedureSection,

    /// A section keyword appears inside another section.
    #[error("nested section: {0} may not appear inside another section")]
    NestedSection(String),

    /// Something follows the BEGIN block's END.
    #[error("unexpected '{0}' after the procedure section; sections may not repeat")]
    TrailingContent(String),

    /// A declared name is empty or contains whitespace, `=` or a quote.
    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),

    /// An initializer is not wrapped in double quotes.
    #[error("invalid initial value for '{0}': must be wrapped in double quotes")]
    InvalidInitialValue(String),

    /// An initializer is `""`.
    #[error("empty initial value for '{0}'")]
    EmptyInitialValue(String),

    /// A quoted span was opened but never closed within its clause.
    #[error("unbalanced quote")]
    UnbalancedQuote,

    /// The leading keyword of a clause is not a known action.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// An action is missing one of its positional arguments.
    #[error("{action} requires a {argument}")]
    MissingArgument {
        action: Action,
        argument: &'static str,
    },

    /// A `$name` reference names a variable absent from the DECLARE section.
    #[error("variable '{0}' is not declared in DECLARE section")]
    UndeclaredVariable(String),

    /// A value token is neither `$name` nor a non-empty quoted literal.
    #[error("value invalid: {0}")]
    InvalidValue(String),

    /// A location token does not have the shape `kind::"selector"`.
    #[error("location invalid: {0}")]
    InvalidLocation(String),

    /// GET_TEXT / GET_HTML without the `INTO` keyword.
    #[error("{0} is missing the 'INTO' keyword")]
    MissingInto(Action),

    /// A destination that is not written as `$name`.
    #[error("destination '{0}' must start with '$'")]
    InvalidDestination(String),

    /// A WAIT duration without `ms` or `s`.
    #[error("unit required for WAIT value '{0}' (use ms or s)")]
    MissingUnit(String),

    /// A WAIT duration whose number is not a positive integer.
    #[error("WAIT value invalid: '{0}'")]
    InvalidDuration(String),
}

/// Top-level error for compiling and running scripts.
#[derive(Error, Debug)]
pub enum SeplError {
    /// A section-level syntax error.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// A malformed clause in the DECLARE section.
    #[error("syntax error in declaration '{clause}': {source}")]
    Declaration {
        clause: String,
        #[source]
        source: SyntaxError,
    },

    /// A malformed clause in the BEGIN section (1-based index).
    #[error("syntax error in statement {index} '{clause}': {source}")]
    Statement {
        index: usize,
        clause: String,
        #[source]
        source: SyntaxError,
    },

    /// The browser backend failed while executing a statement (1-based index).
    #[error("statement {index} ({action}) failed: {source}")]
    Driver {
        index: usize,
        action: Action,
        #[source]
        source: DriverError,
    },

    /// Closing the browser session after a successful run failed.
    #[error("failed to close browser session: {0}")]
    Close(#[source] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be written or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl SeplError {
    /// True for every compile-time failure.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            SeplError::Syntax(_) | SeplError::Declaration { .. } | SeplError::Statement { .. }
        )
    }

    /// The underlying syntax error, if this is a compile-time failure.
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            SeplError::Syntax(e) => Some(e),
            SeplError::Declaration { source, .. } | SeplError::Statement { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SeplError::Syntax(_) | SeplError::Declaration { .. } | SeplError::Statement { .. } => 2,
            SeplError::Driver { .. } | SeplError::Close(_) => 1,
            SeplError::Io(_) | SeplError::Json(_) => 4,
            SeplError::Config(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::UndeclaredVariable("x".to_string());
        assert!(err.to_string().contains("not declared"));

        let err = SyntaxError::MissingArgument { action: Action::Goto, argument: "value" };
        assert_eq!(err.to_string(), "GOTO requires a value");

        let err = SyntaxError::MissingInto(Action::GetHtml);
        assert!(err.to_string().contains("GET_HTML"));
    }

    #[test]
    fn test_statement_error_wraps_source() {
        let err = SeplError::Statement {
            index: 2,
            clause: "CLICK foo".to_string(),
            source: SyntaxError::InvalidLocation("foo".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("statement 2"));
        assert!(msg.contains("location invalid"));
        assert!(err.is_syntax());
        assert_eq!(err.syntax_error(), Some(&SyntaxError::InvalidLocation("foo".to_string())));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SeplError::Syntax(SyntaxError::EmptyProcedureSection).exit_code(), 2);
        let err = SeplError::Driver {
            index: 1,
            action: Action::Click,
            source: DriverError::NoSuchElement("#a".to_string()),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(!err.is_syntax());
        assert_eq!(SeplError::Config("bad".to_string()).exit_code(), 5);
    }

    #[test]
    fn test_json_errors_exit_as_io() {
        let err: SeplError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SeplError::Json(_)));
        assert_eq!(err.exit_code(), 4);
        assert!(!err.is_syntax());
    }
}
