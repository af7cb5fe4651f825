//! Builds typed [`Statement`]s from tokenized clauses.
//!
//! Values and destinations are resolved against the [`VariableStore`] here,
//! once. Locations are only checked for shape; the element itself is looked
//! up when the statement executes.

use tracing::debug;

use crate::declare::{is_variable_name, unquote};
use crate::error::SyntaxError;
use crate::statement::{Action, Destination, Location, LocatorKind, Statement, Value};
use crate::variables::VariableStore;

const INTO: &str = "INTO";
const LOCATION_SEP: &str = "::";

/// Builds one statement from its tokens.
///
/// Tokens beyond the ones an action consumes are ignored.
pub fn build_statement(tokens: &[String], vars: &VariableStore) -> Result<Statement, SyntaxError> {
    let keyword = tokens.first().map(String::as_str).unwrap_or_default();
    let action: Action = keyword
        .parse()
        .map_err(|_| SyntaxError::UnknownAction(keyword.to_string()))?;
    let arg = |i: usize, argument: &'static str| {
        tokens
            .get(i)
            .map(String::as_str)
            .ok_or(SyntaxError::MissingArgument { action, argument })
    };

    let (statement, consumed) = match action {
        Action::Goto => (Statement::Goto { value: resolve_value(arg(1, "value")?, vars)? }, 2),
        Action::Click => (
            Statement::Click { location: resolve_location(arg(1, "location")?)? },
            2,
        ),
        Action::SendKeys => {
            let location = resolve_location(arg(1, "location")?)?;
            let value = resolve_value(arg(2, "value")?, vars)?;
            (Statement::SendKeys { location, value }, 3)
        }
        Action::GetText | Action::GetHtml => {
            let location = resolve_location(arg(1, "location")?)?;
            if tokens.get(2).map(String::as_str) != Some(INTO) {
                return Err(SyntaxError::MissingInto(action));
            }
            let destination = resolve_destination(arg(3, "destination")?, vars)?;
            let statement = if action == Action::GetText {
                Statement::GetText { location, destination }
            } else {
                Statement::GetHtml { location, destination }
            };
            (statement, 4)
        }
        Action::Wait => (Statement::Wait { millis: resolve_duration(arg(1, "duration")?)? }, 2),
    };

    if tokens.len() > consumed {
        debug!(%action, ignored = ?&tokens[consumed..], "ignoring extra tokens");
    }
    Ok(statement)
}

/// `$name` references a declared variable; anything else must be a
/// non-empty quoted literal.
pub fn resolve_value(token: &str, vars: &VariableStore) -> Result<Value, SyntaxError> {
    if let Some(name) = var_ref(token) {
        let snapshot = vars
            .get(name)
            .ok_or_else(|| SyntaxError::UndeclaredVariable(name.to_string()))?;
        return Ok(Value::Var { name: name.to_string(), snapshot: snapshot.to_string() });
    }
    match unquote(token) {
        Some(text) if !text.is_empty() => Ok(Value::Plain { text: text.to_string() }),
        _ => Err(SyntaxError::InvalidValue(token.to_string())),
    }
}

/// Parses `kind::"selector"` with kind one of `xpath`, `css`, `text`.
pub fn resolve_location(token: &str) -> Result<Location, SyntaxError> {
    let invalid = || SyntaxError::InvalidLocation(token.to_string());
    let (prefix, quoted) = token.split_once(LOCATION_SEP).ok_or_else(invalid)?;
    let kind = LocatorKind::from_prefix(prefix).ok_or_else(invalid)?;
    match unquote(quoted) {
        Some(selector) if !selector.is_empty() => Ok(Location::new(kind, selector)),
        _ => Err(invalid()),
    }
}

/// Parses `<n>ms` or `<n>s` into milliseconds. `n` must be a positive integer.
pub fn resolve_duration(token: &str) -> Result<u64, SyntaxError> {
    let (number, scale) = if let Some(n) = token.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = token.strip_suffix('s') {
        (n, 1000)
    } else {
        return Err(SyntaxError::MissingUnit(token.to_string()));
    };
    let invalid = || SyntaxError::InvalidDuration(token.to_string());
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    number
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(invalid)
}

/// `$name` naming a declared variable.
pub fn resolve_destination(token: &str, vars: &VariableStore) -> Result<Destination, SyntaxError> {
    let name = var_ref(token).ok_or_else(|| SyntaxError::InvalidDestination(token.to_string()))?;
    let slot = vars
        .lookup(name)
        .ok_or_else(|| SyntaxError::UndeclaredVariable(name.to_string()))?;
    Ok(Destination { name: name.to_string(), slot })
}

fn var_ref(token: &str) -> Option<&str> {
    token.strip_prefix('$').filter(|name| is_variable_name(name))
}
