//! Diagnostics for the conch command resolution engine.
//!
//! Provides [`Diagnostic`], [`Severity`], [`Span`], and [`LineIndex`] types
//! used to report problems found while tokenizing and resolving shell input.
//! Diagnostic codes are defined in the [`codes`] module.
//!
//! Resolution never fails with an error value: malformed or unmatched input
//! is reported through diagnostics so callers can render precise inline
//! feedback (underline the offending token) while still consuming the rest
//! of the parse.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// ── LineIndex ────────────────────────────────────────────────────────────

/// Maps byte offsets in an input string to line and column positions.
///
/// Lines and columns are **0-indexed** internally. Use [`LineIndex::line_col`]
/// to get a `(line, col)` pair and add 1 when displaying to users.
///
/// Shell input is usually a single line, but pasted input may contain
/// newlines; the index is built in O(n) time and each lookup is O(log n)
/// via binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a `LineIndex` from input text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 0-indexed `(line, column)` pair.
    ///
    /// If `offset` is past the end of the input, the last line is returned
    /// with the column clamped to the line length.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line, col)
    }

    /// Byte offset of the start of the given 0-indexed line.
    ///
    /// Returns `None` if `line` is out of bounds.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Total number of lines (at least 1, even for empty input).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error — the input does not resolve to a valid command.
    Error,
    /// Warning — the input resolves but may not mean what was typed.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the input string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A diagnostic message produced by the tokenizer or resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"CSH0202"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form
    /// strings. Absent when no context is applicable.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Context is a set of key-value string pairs providing structured
    /// details about the diagnostic for tooling, filtering, and programmatic
    /// consumption. Keys are short descriptors like `"query"`, `"option"`,
    /// `"parameter"`, `"value"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code,
    /// if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::MALFORMED_TOKEN => Some(
            "A lone `-` or `--` is not a complete token. Long options are \
             written `--name`; short options are written `-x` with at least \
             one character after the dash.",
        ),
        codes::UNKNOWN_QUERY => Some(
            "The first word of the input matched no registered command or \
             alias. Command matching is case-insensitive and exact; check \
             the catalog for the available representations.",
        ),
        codes::UNKNOWN_OPTION => Some(
            "The long option is not declared on the resolved command. \
             Options are scoped to the query they are declared on and are \
             not inherited from parent queries.",
        ),
        codes::UNKNOWN_SHORT_OPTION => Some(
            "A character in the short-option bundle is not declared on the \
             resolved command. Short options are case-sensitive; the other \
             characters of the bundle are still bound.",
        ),
        codes::UNEXPECTED_PARAMETER => Some(
            "A positional value was given after every declared parameter \
             slot was already filled. Only a trailing repeatable parameter \
             accepts an open-ended number of values.",
        ),
        codes::PARAMETER_SHAPE_MISMATCH => Some(
            "The value was bound to its parameter slot but did not match \
             the slot's declared shape pattern. The binding is kept so the \
             rest of the input still resolves for live feedback.",
        ),
        codes::MISSING_REQUIRED_PARAMETER => Some(
            "A parameter declared without `isOptional` received no value \
             before the end of the input.",
        ),
        codes::MISSING_OPTION_VALUE => Some(
            "The option declares a required value (e.g. `--name <value>`) \
             but the next token is missing or is itself an option.",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── LineIndex ────────────────────────────────────────────────────────

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("git commit");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(4), (0, 4));
    }

    #[test]
    fn line_index_pasted_multiline() {
        let idx = LineIndex::new("cd\nhelp cd");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_col(1), (0, 1));
        assert_eq!(idx.line_col(3), (1, 0));
        assert_eq!(idx.line_col(8), (1, 5));
    }

    #[test]
    fn line_index_empty_input() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_col(0), (0, 0));
    }

    #[test]
    fn line_index_offset_past_end() {
        let idx = LineIndex::new("cd");
        let (line, col) = idx.line_col(50);
        assert_eq!(line, 0);
        assert_eq!(col, 50);
    }

    #[test]
    fn line_index_line_start() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_start(0), Some(0));
        assert_eq!(idx.line_start(1), Some(3));
        assert_eq!(idx.line_start(2), None);
    }

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_new_valid() {
        let s = Span::new(2, 6);
        assert_eq!(s.start, 2);
        assert_eq!(s.end, 6);
    }

    #[test]
    fn span_empty() {
        let s = Span::empty(4);
        assert_eq!(s.start, 4);
        assert_eq!(s.end, 4);
    }

    #[test]
    #[should_panic(expected = "Span end (1) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 1);
    }

    // ── Diagnostic constructors and Display ─────────────────────────────

    #[test]
    fn diagnostic_error_constructor() {
        let d = Diagnostic::error(codes::UNKNOWN_OPTION, "unknown option", None);
        assert_eq!(d.id, "CSH0202");
        assert_eq!(d.severity, Severity::Error);
        assert!(d.span.is_none());
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::UNKNOWN_QUERY, "unknown command", None);
        assert_eq!(format!("{d}"), "error[CSH0201]: unknown command");
    }

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    // ── explain() ───────────────────────────────────────────────────────

    #[test]
    fn all_codes_have_explanations() {
        let all = [
            codes::MALFORMED_TOKEN,
            codes::UNKNOWN_QUERY,
            codes::UNKNOWN_OPTION,
            codes::UNKNOWN_SHORT_OPTION,
            codes::UNEXPECTED_PARAMETER,
            codes::PARAMETER_SHAPE_MISMATCH,
            codes::MISSING_REQUIRED_PARAMETER,
            codes::MISSING_OPTION_VALUE,
        ];
        for code in &all {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
    }

    #[test]
    fn explain_unknown_code() {
        assert!(explain("CSH9999").is_none());
    }

    // ── Serde ───────────────────────────────────────────────────────────

    #[test]
    fn diagnostic_serde_roundtrip() {
        let d = Diagnostic::error(
            codes::PARAMETER_SHAPE_MISMATCH,
            "value does not match shape",
            Some(Span::new(3, 9)),
        );
        let json = serde_json::to_string(&d).unwrap();
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::error(codes::UNKNOWN_QUERY, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("span"), "None span should be omitted: {json}");
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }

    #[test]
    fn diagnostic_context_deterministic_order() {
        let d = Diagnostic::error(codes::UNKNOWN_OPTION, "test", None).with_context(
            BTreeMap::from([
                ("query".into(), "cd".into()),
                ("option".into(), "force".into()),
            ]),
        );
        let json = serde_json::to_string(&d).unwrap();
        let o_pos = json.find("\"option\"").unwrap();
        let q_pos = json.find("\"query\"").unwrap();
        assert!(
            o_pos < q_pos,
            "BTreeMap should serialize in alphabetical key order: {json}"
        );
    }
}
