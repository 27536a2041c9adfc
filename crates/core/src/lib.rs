//! conch core library.
//!
//! The command resolution engine for an interactive shell: free-form input
//! text is tokenized, matched against the frozen command catalog, and
//! frozen into an immutable [`ResolvedContext`] for executors and
//! renderers. The main entry point is [`resolve`]; it runs identically on
//! every keystroke (live suggestions) and on submit (execution).
//!
//! Resolution is synchronous, single-threaded, and allocation-local: given
//! a text string and a shared reference to an already-built
//! [`Catalog`](conch_catalog::Catalog), it runs to completion without I/O
//! or locking, so one catalog serves arbitrarily many concurrent
//! resolutions.

#![warn(missing_docs)]

/// The immutable resolved context and its staged builder.
pub mod context;
/// The resolver: walks tokens against the catalog tree.
pub mod resolver;
/// Shell input lexer.
pub mod tokenizer;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Resolver
pub use resolver::{ClassifiedToken, Resolution, SemKind, resolve};

// Context
pub use context::{ContextBuilder, OptionContext, ParameterContext, ResolvedContext};

// Tokenizer
pub use tokenizer::{LexKind, Token, tokenize};

// Diagnostics (re-exported from the diagnostics crate)
pub use conch_diagnostics::{Diagnostic, Severity, Span, codes};
