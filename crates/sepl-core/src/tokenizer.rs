//! Quote-aware tokenization of BEGIN clauses.
//!
//! Each clause is split on whitespace and quoted spans that were broken apart
//! by the split are merged back into a single token, so
//! `SEND_KEYS css::"#q" "What's up?"` yields three tokens.

use crate::error::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    InQuotedSpan,
}

/// Tokenizes one clause.
///
/// A token with an odd number of `"` opens a span while scanning and closes
/// it while inside one; the span's tokens are rejoined with single spaces.
/// Tokens with zero or two quotes (e.g. `"#a"`) pass through as they are.
pub fn tokenize_clause(clause: &str) -> Result<Vec<String>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut span: Vec<&str> = Vec::new();
    let mut state = State::Scanning;

    for raw in clause.split_whitespace() {
        let toggles = raw.matches('"').count() % 2 == 1;
        match (state, toggles) {
            (State::Scanning, false) => tokens.push(raw.to_string()),
            (State::Scanning, true) => {
                span.push(raw);
                state = State::InQuotedSpan;
            }
            (State::InQuotedSpan, false) => span.push(raw),
            (State::InQuotedSpan, true) => {
                span.push(raw);
                tokens.push(span.join(" "));
                span.clear();
                state = State::Scanning;
            }
        }
    }

    if state == State::InQuotedSpan {
        return Err(SyntaxError::UnbalancedQuote);
    }
    Ok(tokens)
}
