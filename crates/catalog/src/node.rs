//! The frozen command catalog.
//!
//! A [`Catalog`] is an arena of [`QueryNode`]s addressed by stable
//! [`NodeId`] indices. It is built once at startup from [`QueryDef`]s,
//! immutable afterward, and shared read-only across arbitrarily many
//! concurrent resolutions. Representations are lowercased at build time so
//! lookups are plain map probes with no per-call comparer overhead.
//!
//! [`QueryDef`]: crate::def::QueryDef

use crate::def::Documentation;
use regex::Regex;
use std::collections::HashMap;

/// Stable index of a [`QueryNode`] inside a [`Catalog`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A compiled value-shape pattern for a parameter slot.
///
/// The pattern is anchored at compile time (`^(?:…)$`), so a value matches
/// only when the whole token text matches.
#[derive(Debug, Clone)]
pub struct ShapePattern {
    source: String,
    regex: Regex,
}

impl ShapePattern {
    pub(crate) fn compile(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern source as declared in the definition (unanchored).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the whole of `text` matches the pattern.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A frozen positional parameter slot.
#[derive(Debug, Clone)]
pub struct ParameterSlot {
    pub(crate) key: String,
    pub(crate) template: Option<ShapePattern>,
    pub(crate) is_optional: bool,
    pub(crate) is_repeatable: bool,
    pub(crate) documentation: Option<Documentation>,
}

impl ParameterSlot {
    /// Key the bound value is retrieved under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The compiled shape pattern, if one was declared.
    pub fn template(&self) -> Option<&ShapePattern> {
        self.template.as_ref()
    }

    /// Whether resolution is valid without a value for this slot.
    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// Whether this slot consumes all remaining positional values.
    pub fn is_repeatable(&self) -> bool {
        self.is_repeatable
    }

    /// Display-only documentation.
    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }

    /// Whether `text` satisfies the slot's shape. Slots without a template
    /// accept any text.
    pub fn accepts(&self, text: &str) -> bool {
        self.template.as_ref().is_none_or(|t| t.matches(text))
    }
}

/// A frozen option slot (`--long` / `-s`).
///
/// The long form(s) and the short character all resolve to the same slot;
/// bindings recorded under either form land on the same key.
#[derive(Debug, Clone)]
pub struct OptionSlot {
    pub(crate) key: String,
    pub(crate) representations: Vec<String>,
    pub(crate) short: Option<char>,
    pub(crate) parameters: Vec<ParameterSlot>,
    pub(crate) documentation: Option<Documentation>,
}

impl OptionSlot {
    /// Key the binding is retrieved under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Long-form representations as declared.
    pub fn representations(&self) -> &[String] {
        &self.representations
    }

    /// Single-character short form, if declared.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Parameters the option itself binds.
    pub fn parameters(&self) -> &[ParameterSlot] {
        &self.parameters
    }

    /// Display-only documentation.
    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }
}

/// One node of the frozen catalog tree: a query or nested sub-query.
#[derive(Debug)]
pub struct QueryNode {
    pub(crate) key: String,
    pub(crate) representations: Vec<String>,
    pub(crate) documentation: Option<Documentation>,
    pub(crate) parameters: Vec<ParameterSlot>,
    pub(crate) options: Vec<OptionSlot>,
    /// Lowercased long form → index into `options`.
    pub(crate) options_by_rep: HashMap<String, usize>,
    /// Case-sensitive short char → index into `options`.
    pub(crate) options_by_char: HashMap<char, usize>,
    pub(crate) children: Vec<NodeId>,
    /// Lowercased child representation → child node.
    pub(crate) queries: HashMap<String, NodeId>,
    pub(crate) default_query: Option<NodeId>,
    /// 1 for top-level commands, increasing per nesting level.
    pub(crate) depth: usize,
}

impl QueryNode {
    /// Unique key identifying this query.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Alias representations as declared.
    pub fn representations(&self) -> &[String] {
        &self.representations
    }

    /// Display-only documentation.
    pub fn documentation(&self) -> Option<&Documentation> {
        self.documentation.as_ref()
    }

    /// Ordered positional parameter slots.
    pub fn parameters(&self) -> &[ParameterSlot] {
        &self.parameters
    }

    /// Options declared on this query.
    pub fn options(&self) -> &[OptionSlot] {
        &self.options
    }

    /// Look up an option by its long-form representation (case-insensitive,
    /// without the `--` prefix).
    pub fn option_by_representation(&self, rep: &str) -> Option<&OptionSlot> {
        self.options_by_rep
            .get(&rep.to_lowercase())
            .map(|&i| &self.options[i])
    }

    /// Look up an option by its short character (case-sensitive).
    pub fn option_by_char(&self, short: char) -> Option<&OptionSlot> {
        self.options_by_char.get(&short).map(|&i| &self.options[i])
    }

    /// Nested sub-queries in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Look up a child sub-query by one of its representations
    /// (case-insensitive).
    pub fn find_query(&self, word: &str) -> Option<NodeId> {
        self.queries.get(&word.to_lowercase()).copied()
    }

    /// The default sub-query, if one is declared.
    pub fn default_query(&self) -> Option<NodeId> {
        self.default_query
    }

    /// Nesting depth (1 for top-level commands).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl std::fmt::Display for QueryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "query {}", self.key)
    }
}

/// The immutable catalog of all recognized commands.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) nodes: Vec<QueryNode>,
    pub(crate) roots: Vec<NodeId>,
    /// Lowercased top-level representation → root node.
    pub(crate) root_index: HashMap<String, NodeId>,
    pub(crate) max_depth: usize,
}

impl Catalog {
    /// The node addressed by `id`.
    ///
    /// `NodeId`s are only produced by this catalog, so the index is always
    /// in bounds.
    pub fn node(&self, id: NodeId) -> &QueryNode {
        &self.nodes[id.0]
    }

    /// Top-level commands in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Look up a top-level command by one of its representations
    /// (case-insensitive).
    pub fn find_root(&self, word: &str) -> Option<NodeId> {
        self.root_index.get(&word.to_lowercase()).copied()
    }

    /// Maximum nesting depth across the whole catalog.
    ///
    /// Used by the resolver as the hop bound for default-query descent, so
    /// a resolution terminates even on a misconfigured catalog.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Total number of nodes in the catalog.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog holds no commands.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
