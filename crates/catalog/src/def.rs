//! Declarative command definitions.
//!
//! These types describe what a command *is* — its key, aliases, parameters,
//! options, and nested sub-queries — independent of how input is matched
//! against it. Definitions are deserialized from JSON catalog files or built
//! in code, then frozen into a [`Catalog`](crate::Catalog) once at startup.

use serde::{Deserialize, Serialize};

/// Display-only documentation attached to a query, option, or parameter.
///
/// Never consulted during resolution; carried through the catalog so help
/// and inspection surfaces can render it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    /// Short display title (e.g. `"Current directory"`).
    pub title: String,
    /// Longer description shown in detailed help.
    pub description: String,
}

impl Documentation {
    /// Create documentation from a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Definition of a positional parameter slot on a query or option.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterDef {
    /// Unique key the bound value is retrieved under (e.g. `"path"`).
    pub key: String,
    /// Optional value-shape pattern (regular expression source). When
    /// present, bound values must match the whole pattern; the pattern is
    /// anchored automatically at catalog build time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Whether resolution is valid without a value for this slot.
    pub is_optional: bool,
    /// Whether this slot consumes all remaining positional values. At most
    /// one repeatable parameter may be declared per list and it must be the
    /// last slot.
    pub is_repeatable: bool,
    /// Display-only documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

impl ParameterDef {
    /// Create a required, non-repeatable parameter with no shape pattern.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the value-shape pattern (regular expression source).
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Mark the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark the parameter repeatable (must be the trailing slot).
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }

    /// Attach documentation.
    #[must_use]
    pub fn with_documentation(mut self, doc: Documentation) -> Self {
        self.documentation = Some(doc);
        self
    }
}

/// Definition of a named option (`--long` / `-s`) on a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionDef {
    /// Unique key the binding is retrieved under (e.g. `"force"`).
    pub key: String,
    /// Long-form representations, matched case-insensitively after the
    /// `--` prefix (e.g. `["force", "f-mode"]`).
    pub representations: Vec<String>,
    /// Optional single-character short form, matched case-sensitively
    /// inside `-abc` bundles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Parameters the option itself binds (e.g. `--name <value>`).
    pub parameters: Vec<ParameterDef>,
    /// Display-only documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
}

impl OptionDef {
    /// Create a flag-style option with a single long representation equal
    /// to its key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            representations: vec![key.clone()],
            key,
            ..Self::default()
        }
    }

    /// Add a long-form representation.
    #[must_use]
    pub fn with_representation(mut self, rep: impl Into<String>) -> Self {
        self.representations.push(rep.into());
        self
    }

    /// Set the single-character short form.
    #[must_use]
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Add a parameter the option binds.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDef) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Attach documentation.
    #[must_use]
    pub fn with_documentation(mut self, doc: Documentation) -> Self {
        self.documentation = Some(doc);
        self
    }
}

/// Definition of a query (command) or nested sub-query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryDef {
    /// Unique key identifying the query (e.g. `"current-directory"`).
    pub key: String,
    /// Alias representations matched case-insensitively against input
    /// words (e.g. `["current-directory", "cd", "chdir"]`). Must be unique
    /// within the sibling scope.
    pub representations: Vec<String>,
    /// Display-only documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Documentation>,
    /// Ordered positional parameter slots.
    pub parameters: Vec<ParameterDef>,
    /// Options declared on this query.
    pub options: Vec<OptionDef>,
    /// Nested sub-queries.
    pub queries: Vec<QueryDef>,
    /// Key of the nested sub-query to descend into when no token matches
    /// any child representation. Must name a direct child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_query_key: Option<String>,
}

impl QueryDef {
    /// Create a query whose sole representation is its key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            representations: vec![key.clone()],
            key,
            ..Self::default()
        }
    }

    /// Add an alias representation.
    #[must_use]
    pub fn with_representation(mut self, rep: impl Into<String>) -> Self {
        self.representations.push(rep.into());
        self
    }

    /// Add a positional parameter slot.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDef) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add an option.
    #[must_use]
    pub fn with_option(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }

    /// Add a nested sub-query.
    #[must_use]
    pub fn with_query(mut self, query: QueryDef) -> Self {
        self.queries.push(query);
        self
    }

    /// Name a direct child as the default branch.
    #[must_use]
    pub fn with_default_query(mut self, key: impl Into<String>) -> Self {
        self.default_query_key = Some(key.into());
        self
    }

    /// Attach documentation.
    #[must_use]
    pub fn with_documentation(mut self, doc: Documentation) -> Self {
        self.documentation = Some(doc);
        self
    }
}
