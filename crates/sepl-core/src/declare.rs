//! DECLARE section parsing.

use tracing::debug;

use crate::error::{SeplError, SyntaxError};
use crate::variables::VariableStore;

pub const ASSIGN_OP: &str = ":=";

/// Splits `;`-terminated clauses out of a section's lines.
///
/// Lines are joined with a single space, so a clause may span lines.
pub(crate) fn clauses<'a>(lines: &[&str], buf: &'a mut String) -> impl Iterator<Item = &'a str> {
    *buf = lines.join(" ");
    buf.split(';').map(str::trim).filter(|c| !c.is_empty())
}

/// Applies every DECLARE clause to `store`, in order.
pub fn parse_declarations(lines: &[&str], store: &mut VariableStore) -> Result<(), SeplError> {
    let mut buf = String::new();
    for clause in clauses(lines, &mut buf) {
        let (name, value) = parse_declaration(clause).map_err(|source| SeplError::Declaration {
            clause: clause.to_string(),
            source,
        })?;
        debug!(name, value, "declared variable");
        store.declare(name, value);
    }
    Ok(())
}

/// Parses `name` or `name := "literal"`.
fn parse_declaration(clause: &str) -> Result<(&str, &str), SyntaxError> {
    let (name, initializer) = match clause.split_once(ASSIGN_OP) {
        Some((name, init)) => (name.trim(), Some(init.trim())),
        None => (clause.trim(), None),
    };
    if !is_variable_name(name) {
        return Err(SyntaxError::InvalidVariableName(name.to_string()));
    }
    let value = match initializer {
        None => "",
        Some(raw) => {
            let value = unquote(raw).ok_or_else(|| SyntaxError::InvalidInitialValue(name.to_string()))?;
            if value.is_empty() {
                return Err(SyntaxError::EmptyInitialValue(name.to_string()));
            }
            value
        }
    };
    Ok((name, value))
}

/// Non-empty, with no whitespace, `=` or quote characters.
pub(crate) fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c == '\'')
}

/// Strips one pair of surrounding double quotes.
pub(crate) fn unquote(token: &str) -> Option<&str> {
    token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(lines: &[&str]) -> Result<VariableStore, SeplError> {
        let mut store = VariableStore::new();
        parse_declarations(lines, &mut store)?;
        Ok(store)
    }

    #[test]
    fn test_initializers_and_defaults() {
        let store = declare(&[r#"a:="123 = 1"; b:="890"; c;"#]).unwrap();
        assert_eq!(store.get("a"), Some("123 = 1"));
        assert_eq!(store.get("b"), Some("890"));
        assert_eq!(store.get("c"), Some(""));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_one_clause_per_line() {
        let store = declare(&["post_list;", "comments;", r#"a := "Hi!";"#, r#"e := "se@email.com";"#]).unwrap();
        assert_eq!(store.get("post_list"), Some(""));
        assert_eq!(store.get("comments"), Some(""));
        assert_eq!(store.get("a"), Some("Hi!"));
        assert_eq!(store.get("e"), Some("se@email.com"));
    }

    #[test]
    fn test_initializer_keeps_later_assign_ops() {
        let store = declare(&[r#"x := "a := b";"#]).unwrap();
        assert_eq!(store.get("x"), Some("a := b"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let store = declare(&[r#"a := "1"; a := "2";"#]).unwrap();
        assert_eq!(store.get("a"), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_names() {
        for clause in ["my var;", r#":= "x";"#, "a=b;", r#""a";"#, "'a';"] {
            let err = declare(&[clause]).unwrap_err();
            assert!(
                matches!(err.syntax_error(), Some(SyntaxError::InvalidVariableName(_))),
                "{clause}: {err}"
            );
        }
    }

    #[test]
    fn test_unquoted_initializer() {
        let err = declare(&["a := x;"]).unwrap_err();
        assert_eq!(err.syntax_error(), Some(&SyntaxError::InvalidInitialValue("a".to_string())));

        let err = declare(&["a := ;"]).unwrap_err();
        assert_eq!(err.syntax_error(), Some(&SyntaxError::InvalidInitialValue("a".to_string())));
    }

    #[test]
    fn test_empty_initializer() {
        let err = declare(&[r#"a := "";"#]).unwrap_err();
        assert_eq!(err.syntax_error(), Some(&SyntaxError::EmptyInitialValue("a".to_string())));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""abc""#), Some("abc"));
        assert_eq!(unquote(r#""""#), Some(""));
        assert_eq!(unquote(r#"""#), None);
        assert_eq!(unquote("abc"), None);
    }
}
