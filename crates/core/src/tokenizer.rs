//! Shell input lexer.
//!
//! Splits raw input into whitespace-separated tokens with a provisional
//! lexical classification. The lexer is total and deterministic: it never
//! fails, never consults the catalog, and the same input always yields the
//! same token sequence. Final semantic classification (query word vs.
//! parameter value, known vs. unknown option) is scope-dependent and
//! assigned later by the resolver.

use conch_diagnostics::Span;
use serde::Serialize;

/// Provisional lexical classification of a token.
///
/// `Word` covers both query-word and parameter-value candidates; the two
/// cannot be told apart without the catalog scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LexKind {
    /// A bare run of non-whitespace characters.
    Word,
    /// `--` followed by at least one character; the text after the prefix
    /// is the long-option representation.
    LongOption,
    /// `-` followed by at least one character; each character is a
    /// candidate short option.
    ShortBundle,
    /// A lone `-` or `--` with nothing following.
    Wrong,
}

/// A token that borrows its text directly from the input — zero allocation.
///
/// `text` is always exactly `&input[start..end]`. The `start`/`end` byte
/// offsets are stored alongside for consumers that need numeric positions
/// (spans, highlighting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Provisional lexical classification.
    pub lex: LexKind,
    /// Borrowed slice of the input for this token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// The token's byte span in the input.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Tokenize shell input into a sequence of borrowed tokens.
///
/// Tokens are separated by runs of ASCII whitespace, which is skipped and
/// not emitted. Re-joining the token texts with the skipped separators
/// reproduces the input exactly. Multi-byte characters pass through inside
/// word runs: UTF-8 continuation bytes never match ASCII whitespace.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut toks = Vec::new();
    let b = input.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        if b[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        while i < b.len() && !b[i].is_ascii_whitespace() {
            i += 1;
        }
        let text = &input[start..i];
        toks.push(Token {
            lex: classify(text),
            text,
            start,
            end: i,
        });
    }
    toks
}

/// Provisional classification from lexical shape alone.
fn classify(text: &str) -> LexKind {
    if let Some(rest) = text.strip_prefix("--") {
        if rest.is_empty() {
            LexKind::Wrong
        } else {
            LexKind::LongOption
        }
    } else if let Some(rest) = text.strip_prefix('-') {
        if rest.is_empty() {
            LexKind::Wrong
        } else {
            LexKind::ShortBundle
        }
    } else {
        LexKind::Word
    }
}
