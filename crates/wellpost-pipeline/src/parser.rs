//! Splits generated text into an optional subject line and a body.

use serde::Serialize;

const SUBJECT_PREFIX: &str = "Subject:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPost {
    pub subject_line: Option<String>,
    pub body: String,
}

/// Pure and total. The subject fires only when the first line starts with
/// the exact, case-sensitive `Subject:` prefix; otherwise the input is
/// returned unchanged as the body.
#[must_use]
pub fn parse_response(raw: &str) -> ParsedPost {
    let (first, rest) = match raw.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (raw, ""),
    };

    match first.strip_prefix(SUBJECT_PREFIX) {
        Some(subject) => ParsedPost {
            subject_line: Some(subject.trim().to_string()),
            body: rest.trim().to_string(),
        },
        None => ParsedPost {
            subject_line: None,
            body: raw.to_string(),
        },
    }
}
