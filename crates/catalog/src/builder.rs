//! Catalog construction and build-time validation.
//!
//! Building runs once at startup and is not on the hot path, so every
//! structural rule is checked eagerly here: a definition that would make
//! resolution ambiguous or non-terminating is rejected with a
//! [`CatalogError`] instead of surfacing per-keystroke.

use crate::def::{OptionDef, ParameterDef, QueryDef};
use crate::node::{Catalog, NodeId, OptionSlot, ParameterSlot, QueryNode, ShapePattern};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while freezing command definitions into a [`Catalog`].
///
/// All of these indicate a broken definition set and are fatal at startup;
/// none of them can occur per-input.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A query, option, or parameter definition has an empty key.
    #[error("empty key in {kind} definition under '{scope}'")]
    EmptyKey {
        /// What kind of definition lacked a key (`query`/`option`/`parameter`).
        kind: &'static str,
        /// The enclosing query key, or `<root>` for top-level commands.
        scope: String,
    },

    /// A query definition declares no alias representations.
    #[error("query '{query}' declares no representations")]
    NoRepresentations {
        /// The offending query key.
        query: String,
    },

    /// Two sibling queries register the same representation.
    #[error("duplicate representation '{representation}' under '{scope}'")]
    DuplicateRepresentation {
        /// The colliding representation (lowercased).
        representation: String,
        /// The enclosing query key, or `<root>` for top-level commands.
        scope: String,
    },

    /// Two options on one query register the same long form.
    #[error("duplicate option representation '{representation}' on query '{query}'")]
    DuplicateOptionRepresentation {
        /// The colliding long form (lowercased).
        representation: String,
        /// The query declaring both options.
        query: String,
    },

    /// Two options on one query register the same short character.
    #[error("duplicate short option '-{short}' on query '{query}'")]
    DuplicateShortOption {
        /// The colliding short character.
        short: char,
        /// The query declaring both options.
        query: String,
    },

    /// `defaultQueryKey` names no direct child of its query.
    #[error("default query '{default}' of '{query}' names no direct child")]
    UnknownDefaultQuery {
        /// The query declaring the default.
        query: String,
        /// The dangling default key.
        default: String,
    },

    /// A repeatable parameter is not the trailing slot (which also covers
    /// declaring more than one repeatable parameter).
    #[error("repeatable parameter '{parameter}' of '{owner}' must be the last slot")]
    MisplacedRepeatable {
        /// The query or option key owning the parameter list.
        owner: String,
        /// The offending parameter key.
        parameter: String,
    },

    /// A parameter's shape template is not a valid regular expression.
    #[error("invalid shape template for parameter '{parameter}': {source}")]
    InvalidTemplate {
        /// The offending parameter key.
        parameter: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },
}

impl Catalog {
    /// Freeze a forest of command definitions into an immutable catalog.
    ///
    /// Fails on the first structural problem found; see [`CatalogError`]
    /// for the full set of rules.
    pub fn build(defs: &[QueryDef]) -> Result<Self, CatalogError> {
        let mut nodes = Vec::new();
        let mut roots = Vec::new();
        let mut root_index = HashMap::new();
        for def in defs {
            let id = insert_query(&mut nodes, def, "<root>", 1)?;
            register_representations(&nodes, id, &mut root_index, "<root>")?;
            roots.push(id);
        }
        let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        Ok(Self {
            nodes,
            roots,
            root_index,
            max_depth,
        })
    }
}

/// Insert `def` and its whole subtree into the arena, children first.
fn insert_query(
    nodes: &mut Vec<QueryNode>,
    def: &QueryDef,
    scope: &str,
    depth: usize,
) -> Result<NodeId, CatalogError> {
    if def.key.is_empty() {
        return Err(CatalogError::EmptyKey {
            kind: "query",
            scope: scope.to_string(),
        });
    }
    if def.representations.is_empty() {
        return Err(CatalogError::NoRepresentations {
            query: def.key.clone(),
        });
    }

    let parameters = build_parameters(&def.parameters, &def.key)?;
    let (options, options_by_rep, options_by_char) = build_options(&def.options, &def.key)?;

    let mut children = Vec::with_capacity(def.queries.len());
    let mut queries = HashMap::new();
    for child in &def.queries {
        let child_id = insert_query(nodes, child, &def.key, depth + 1)?;
        register_representations(nodes, child_id, &mut queries, &def.key)?;
        children.push(child_id);
    }

    let default_query = match &def.default_query_key {
        Some(default) => Some(
            children
                .iter()
                .copied()
                .find(|&c| nodes[c.0].key.eq_ignore_ascii_case(default))
                .ok_or_else(|| CatalogError::UnknownDefaultQuery {
                    query: def.key.clone(),
                    default: default.clone(),
                })?,
        ),
        None => None,
    };

    nodes.push(QueryNode {
        key: def.key.clone(),
        representations: def.representations.clone(),
        documentation: def.documentation.clone(),
        parameters,
        options,
        options_by_rep,
        options_by_char,
        children,
        queries,
        default_query,
        depth,
    });
    Ok(NodeId(nodes.len() - 1))
}

/// Register a node's lowercased representations into its sibling-scope map,
/// rejecting collisions.
fn register_representations(
    nodes: &[QueryNode],
    id: NodeId,
    index: &mut HashMap<String, NodeId>,
    scope: &str,
) -> Result<(), CatalogError> {
    for rep in &nodes[id.0].representations {
        let lowered = rep.to_lowercase();
        if index.insert(lowered.clone(), id).is_some() {
            return Err(CatalogError::DuplicateRepresentation {
                representation: lowered,
                scope: scope.to_string(),
            });
        }
    }
    Ok(())
}

fn build_parameters(
    defs: &[ParameterDef],
    owner: &str,
) -> Result<Vec<ParameterSlot>, CatalogError> {
    let mut slots = Vec::with_capacity(defs.len());
    for (i, def) in defs.iter().enumerate() {
        if def.key.is_empty() {
            return Err(CatalogError::EmptyKey {
                kind: "parameter",
                scope: owner.to_string(),
            });
        }
        // A repeatable slot consumes all remaining positional values, so
        // anything after it could never bind.
        if def.is_repeatable && i + 1 != defs.len() {
            return Err(CatalogError::MisplacedRepeatable {
                owner: owner.to_string(),
                parameter: def.key.clone(),
            });
        }
        let template = match &def.template {
            Some(source) => {
                Some(
                    ShapePattern::compile(source).map_err(|source| CatalogError::InvalidTemplate {
                        parameter: def.key.clone(),
                        source,
                    })?,
                )
            }
            None => None,
        };
        slots.push(ParameterSlot {
            key: def.key.clone(),
            template,
            is_optional: def.is_optional,
            is_repeatable: def.is_repeatable,
            documentation: def.documentation.clone(),
        });
    }
    Ok(slots)
}

type OptionTables = (Vec<OptionSlot>, HashMap<String, usize>, HashMap<char, usize>);

fn build_options(defs: &[OptionDef], query: &str) -> Result<OptionTables, CatalogError> {
    let mut options = Vec::with_capacity(defs.len());
    let mut by_rep = HashMap::new();
    let mut by_char = HashMap::new();
    for (i, def) in defs.iter().enumerate() {
        if def.key.is_empty() {
            return Err(CatalogError::EmptyKey {
                kind: "option",
                scope: query.to_string(),
            });
        }
        for rep in &def.representations {
            let lowered = rep.to_lowercase();
            if by_rep.insert(lowered.clone(), i).is_some() {
                return Err(CatalogError::DuplicateOptionRepresentation {
                    representation: lowered,
                    query: query.to_string(),
                });
            }
        }
        if let Some(short) = def.short
            && by_char.insert(short, i).is_some()
        {
            return Err(CatalogError::DuplicateShortOption {
                short,
                query: query.to_string(),
            });
        }
        options.push(OptionSlot {
            key: def.key.clone(),
            representations: def.representations.clone(),
            short: def.short,
            parameters: build_parameters(&def.parameters, &def.key)?,
            documentation: def.documentation.clone(),
        });
    }
    Ok((options, by_rep, by_char))
}
