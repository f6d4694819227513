//! Input sanitization for raw query text
//!
//! Rejects empty, oversized and unsafe input, strips control characters and
//! normalizes whitespace. Letters from any script pass through untouched so
//! that international place names survive.

use super::error::{InputRejection, InterpretationError};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Maximum query length in characters
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1000;

/// A named pattern that makes the whole input unacceptable
struct DenyRule {
    name: &'static str,
    pattern: Regex,
}

/// Checked in order; the first match decides
static DENY_LIST: LazyLock<Vec<DenyRule>> = LazyLock::new(|| {
    [
        ("script_tag", r"(?i)<\s*/?\s*script\b"),
        (
            "embedded_content_tag",
            r"(?i)<\s*/?\s*(?:iframe|object|embed|applet|link|meta|style|svg)\b",
        ),
        ("html_tag", r"<\s*/?\s*[A-Za-z!][^>]*>"),
        ("event_handler", r"(?i)\bon[a-z]+\s*="),
        ("script_uri", r"(?i)\b(?:javascript|vbscript)\s*:"),
        ("css_expression", r"(?i)\bexpression\s*\("),
        ("script_call", r"(?i)\b(?:eval|alert|confirm|prompt)\s*\("),
        ("encoded_markup", r"(?i)%3[ce]|&lt;|&gt;|&#x?[0-9a-f]+;"),
        ("sql_comment", r"--|/\*|\*/"),
        (
            "sql_statement",
            concat!(
                r"(?i)\b(?:union\s+(?:all\s+)?select|drop\s+(?:table|database)",
                r"|insert\s+into|delete\s+from|exec(?:ute)?\s*\()",
            ),
        ),
        (
            "sql_tautology",
            r#"(?i)['"]\s*(?:or|and)\s+['"]?\w+['"]?\s*=\s*['"]?\w+"#,
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| DenyRule {
        name,
        pattern: Regex::new(pattern).expect("deny-list patterns are valid"),
    })
    .collect()
});

/// Validates and normalizes raw query text
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    max_length: usize,
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUERY_LENGTH)
    }
}

impl InputSanitizer {
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Sanitize raw text into a single-spaced, trimmed string
    pub fn sanitize(&self, raw: &str) -> Result<String, InterpretationError> {
        if raw.trim().is_empty() {
            return Err(InterpretationError::invalid_input(InputRejection::Empty));
        }

        let length = raw.chars().count();
        if length > self.max_length {
            debug!(length, max = self.max_length, "Query exceeds maximum length");
            return Err(InterpretationError::invalid_input(InputRejection::TooLong));
        }

        let stripped: String = raw
            .chars()
            .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();

        if let Some(rule) = matching_rule(&stripped) {
            warn!(rule, "Rejected query containing unsafe pattern");
            return Err(InterpretationError::invalid_input(
                InputRejection::UnsafePattern,
            ));
        }

        let normalized = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(InterpretationError::invalid_input(InputRejection::Empty));
        }
        Ok(normalized)
    }
}

/// Name of the first deny-list rule matching `text`
#[must_use]
pub fn matching_rule(text: &str) -> Option<&'static str> {
    DENY_LIST
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name)
}
