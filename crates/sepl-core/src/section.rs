//! Splits raw script text into its DECLARE and BEGIN sections.

use crate::error::SyntaxError;

pub const DECLARE: &str = "DECLARE";
pub const BEGIN: &str = "BEGIN";
pub const END: &str = "END";

/// The lines of each section with the opening keyword and END removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sections<'a> {
    pub declare: Vec<&'a str>,
    pub procedure: Vec<&'a str>,
}

/// Splits `source` into an optional DECLARE block followed by one BEGIN block.
///
/// Lines are trimmed and blank lines dropped. Keywords must stand alone on
/// their line.
pub fn split_sections(source: &str) -> Result<Sections<'_>, SyntaxError> {
    let lines: Vec<&str> = source
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let first = lines.first().copied().unwrap_or_default();
    if first != DECLARE && first != BEGIN {
        return Err(SyntaxError::MissingSectionKeyword(first.to_string()));
    }

    let mut rest = lines.as_slice();
    let mut sections = Sections::default();

    if first == DECLARE {
        let (body, remaining) = take_section(rest, DECLARE)?;
        sections.declare = body.to_vec();
        rest = remaining;
        match rest.first() {
            Some(&BEGIN) => {}
            Some(other) => return Err(SyntaxError::MissingSectionKeyword(other.to_string())),
            None => return Err(SyntaxError::MissingProcedureSection),
        }
    }

    let (body, remaining) = take_section(rest, BEGIN)?;
    if body.is_empty() {
        return Err(SyntaxError::EmptyProcedureSection);
    }
    if let Some(extra) = remaining.first() {
        return Err(SyntaxError::TrailingContent(extra.to_string()));
    }
    sections.procedure = body.to_vec();
    Ok(sections)
}

/// `lines[0]` is the section keyword; returns the body up to the first END
/// and whatever follows that END.
fn take_section<'s, 'a>(
    lines: &'s [&'a str],
    keyword: &'static str,
) -> Result<(&'s [&'a str], &'s [&'a str]), SyntaxError> {
    let end = lines
        .iter()
        .position(|l| *l == END)
        .ok_or(SyntaxError::UnterminatedSection(keyword))?;
    let body = &lines[1..end];
    if let Some(nested) = body.iter().find(|l| **l == DECLARE || **l == BEGIN) {
        return Err(SyntaxError::NestedSection(nested.to_string()));
    }
    Ok((body, &lines[end + 1..]))
}
