//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. The numbering groups codes by phase: `CSH01xx` for
//! lexical problems, `CSH02xx` for resolution/matching problems, `CSH03xx`
//! for value-shape and arity problems.

/// A lone `-` or `--` with nothing after it.
pub const MALFORMED_TOKEN: &str = "CSH0101";

/// The leading token matched no registered command representation.
pub const UNKNOWN_QUERY: &str = "CSH0201";

/// A long option (`--name`) is not registered in the current scope.
pub const UNKNOWN_OPTION: &str = "CSH0202";

/// A character of a short-option bundle is not registered in the current scope.
pub const UNKNOWN_SHORT_OPTION: &str = "CSH0203";

/// A positional value arrived after every parameter slot was filled.
pub const UNEXPECTED_PARAMETER: &str = "CSH0204";

/// A bound parameter value did not match its declared shape pattern.
pub const PARAMETER_SHAPE_MISMATCH: &str = "CSH0301";

/// A required parameter slot received no value.
pub const MISSING_REQUIRED_PARAMETER: &str = "CSH0302";

/// An option declares a required value but no value token follows it.
pub const MISSING_OPTION_VALUE: &str = "CSH0303";
