//! Shared test helpers for `conch_core` integration tests.

#![allow(unreachable_pub)]

use conch_catalog::{Catalog, OptionDef, ParameterDef, QueryDef};
use conch_core::resolver::{Resolution, SemKind};

/// A small but representative command set: aliases, nested sub-queries
/// with a default branch, options with long and short forms, required and
/// repeatable parameters, and shape templates.
pub fn demo_defs() -> Vec<QueryDef> {
    vec![
        QueryDef::new("current-directory")
            .with_representation("cd")
            .with_representation("chdir")
            .with_parameter(
                ParameterDef::new("path")
                    .with_template(r"\S+")
                    .optional()
                    .repeatable(),
            ),
        QueryDef::new("help")
            .with_representation("aid")
            .with_parameter(ParameterDef::new("item").optional().repeatable()),
        QueryDef::new("open").with_parameter(ParameterDef::new("path").with_template(".+")),
        QueryDef::new("environment")
            .with_representation("env")
            .with_representation("variable")
            .with_default_query("list")
            .with_query(QueryDef::new("list").with_representation("show"))
            .with_query(QueryDef::new("get").with_parameter(
                ParameterDef::new("name").with_template(r"[A-Za-z_][A-Za-z0-9_]*"),
            ))
            .with_query(
                QueryDef::new("set")
                    .with_parameter(
                        ParameterDef::new("name").with_template(r"[A-Za-z_][A-Za-z0-9_]*"),
                    )
                    .with_parameter(ParameterDef::new("value")),
            ),
        QueryDef::new("stat")
            .with_option(OptionDef::new("all").with_short('a'))
            .with_option(OptionDef::new("brief").with_short('b'))
            .with_option(
                OptionDef::new("name")
                    .with_short('n')
                    .with_parameter(ParameterDef::new("value")),
            )
            .with_parameter(ParameterDef::new("target").optional().repeatable()),
        QueryDef::new("pack")
            .with_query(QueryDef::new("add"))
            .with_parameter(ParameterDef::new("items").optional().repeatable()),
    ]
}

pub fn demo_catalog() -> Catalog {
    Catalog::build(&demo_defs()).expect("demo definitions are valid")
}

/// Semantic tags in token order, for concise assertions.
#[allow(dead_code)]
pub fn sem_kinds(resolution: &Resolution) -> Vec<SemKind> {
    resolution.tokens.iter().map(|t| t.sem).collect()
}

/// Diagnostic IDs in emission order.
#[allow(dead_code)]
pub fn diag_ids(resolution: &Resolution) -> Vec<&str> {
    resolution
        .diagnostics
        .iter()
        .map(|d| d.id.as_ref())
        .collect()
}
