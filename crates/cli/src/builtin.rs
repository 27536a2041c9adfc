//! The built-in demo catalog.
//!
//! A small command set shipped with the binary so `conch` is usable
//! without a catalog file: directory navigation, help, and a nested
//! `shell` command with an environment sub-tree that exercises default
//! sub-queries. External catalogs loaded with `--catalog` replace this
//! set entirely.

use conch_catalog::{Catalog, Documentation, OptionDef, ParameterDef, QueryDef};

/// Shape pattern for filesystem-path-looking values.
const PATH_TEMPLATE: &str = r"\S+";
/// Shape pattern for environment variable names.
const VARIABLE_NAME_TEMPLATE: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// Build the built-in catalog.
///
/// The definitions are static and known-valid, so a build failure here is
/// a programming error, not an input condition.
pub(crate) fn builtin_catalog() -> Catalog {
    Catalog::build(&builtin_defs()).expect("built-in catalog definitions are valid")
}

pub(crate) fn builtin_defs() -> Vec<QueryDef> {
    vec![
        current_directory(),
        help(),
        shell(),
    ]
}

fn current_directory() -> QueryDef {
    QueryDef::new("current-directory")
        .with_representation("cd")
        .with_representation("chdir")
        .with_documentation(Documentation::new(
            "Current directory",
            "Gets or sets the current working directory.",
        ))
        .with_parameter(
            ParameterDef::new("path")
                .with_template(PATH_TEMPLATE)
                .optional()
                .repeatable()
                .with_documentation(Documentation::new(
                    "Directory path",
                    "Full or relative path(s) to the working directory.",
                )),
        )
}

fn help() -> QueryDef {
    QueryDef::new("help")
        .with_representation("advice")
        .with_representation("aid")
        .with_documentation(Documentation::new(
            "Help",
            "Shows more information about a requested query.",
        ))
        .with_parameter(
            ParameterDef::new("item")
                .optional()
                .repeatable()
                .with_documentation(Documentation::new(
                    "Query",
                    "Command, query, option, or parameter name to describe.",
                )),
        )
}

fn shell() -> QueryDef {
    QueryDef::new("shell")
        .with_representation("sh")
        .with_documentation(Documentation::new(
            "Shell",
            "Manages the shell itself: environment variables and settings.",
        ))
        .with_query(environment())
        .with_query(setting())
}

fn environment() -> QueryDef {
    let name = ParameterDef::new("name")
        .with_template(VARIABLE_NAME_TEMPLATE)
        .with_documentation(Documentation::new(
            "Variable name",
            "Name of the environment variable.",
        ));
    let value = ParameterDef::new("value").with_documentation(Documentation::new(
        "Variable value",
        "New value of the variable.",
    ));

    QueryDef::new("environment")
        .with_representation("env")
        .with_representation("variable")
        .with_representation("var")
        .with_default_query("list")
        .with_query(
            QueryDef::new("list")
                .with_representation("show")
                .with_option(OptionDef::new("names-only").with_short('n')),
        )
        .with_query(QueryDef::new("get").with_parameter(name.clone()))
        .with_query(
            QueryDef::new("set")
                .with_parameter(name.clone())
                .with_parameter(value),
        )
        .with_query(
            QueryDef::new("remove")
                .with_representation("delete")
                .with_parameter(name),
        )
}

fn setting() -> QueryDef {
    QueryDef::new("setting")
        .with_representation("config")
        .with_default_query("list")
        .with_query(QueryDef::new("list"))
        .with_query(
            QueryDef::new("set")
                .with_parameter(ParameterDef::new("key").with_template(r"[A-Za-z0-9.\-]+"))
                .with_parameter(ParameterDef::new("value")),
        )
}
