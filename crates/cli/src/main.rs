//! `conch` — resolve and inspect interactive-shell command input.
//!
//! The binary wraps the resolution engine for ad-hoc use and scripting:
//! resolve a single input line, tokenize it, list the catalog, explain a
//! diagnostic code, or run a line-oriented REPL. Catalogs load from JSON
//! definition files; without `--catalog` a built-in demo set is used.

mod builtin;
mod render;

use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conch_catalog::{Catalog, QueryDef};
use conch_core::{resolve, tokenize};
use conch_diagnostics::explain;

use crate::builtin::builtin_catalog;
use crate::render::{Format, render_resolution};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "conch",
    version,
    about = "conch — resolve interactive-shell command input against a command catalog"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Path to a catalog JSON file (an array of query definitions). When
    /// omitted, the built-in demo catalog is used.
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Resolve one input line and print the resulting context.
    ///
    /// Exits 1 when the input does not resolve to a valid command.
    Resolve {
        /// The input line; multiple arguments are joined with spaces, so
        /// quoting the whole line is optional.
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        input: Vec<String>,
    },

    /// Tokenize one input line and print the lexical tokens.
    Tokenize {
        /// The input line; multiple arguments are joined with spaces.
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        input: Vec<String>,
    },

    /// List the commands of the catalog as a tree.
    List,

    /// Resolve lines from stdin one at a time (line-oriented REPL).
    Repl,

    /// Explain a diagnostic ID (e.g. CSH0202).
    Explain {
        /// The diagnostic code to explain.
        id: String,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.cmd {
        Cmd::Resolve { input } => cmd_resolve(&input.join(" "), &catalog, format),
        Cmd::Tokenize { input } => cmd_tokenize(&input.join(" ")),
        Cmd::List => cmd_list(&catalog),
        Cmd::Repl => cmd_repl(&catalog, format),
        Cmd::Explain { id } => cmd_explain(&id),
    }
}

/// Load a catalog definition file, or fall back to the built-in set.
fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(builtin_catalog());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read catalog file {path}"))?;
    let defs: Vec<QueryDef> =
        serde_json::from_str(&json).with_context(|| format!("invalid catalog JSON in {path}"))?;
    Catalog::build(&defs).with_context(|| format!("invalid catalog definitions in {path}"))
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_resolve(input: &str, catalog: &Catalog, format: Format) -> Result<()> {
    let resolution = resolve(input, catalog);
    render_resolution(input, &resolution, format);
    if !resolution.context.is_valid() {
        process::exit(1);
    }
    Ok(())
}

fn cmd_tokenize(input: &str) -> Result<()> {
    // Borrowed tokens serialize as (kind, text, span) triples.
    let toks: Vec<serde_json::Value> = tokenize(input)
        .iter()
        .map(|t| {
            serde_json::json!({
                "lex": t.lex,
                "text": t.text,
                "start": t.start,
                "end": t.end,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&toks)?);
    Ok(())
}

fn cmd_list(catalog: &Catalog) -> Result<()> {
    for &root in catalog.roots() {
        print_node(catalog, root, 0);
    }
    Ok(())
}

fn print_node(catalog: &Catalog, id: conch_catalog::NodeId, indent: usize) {
    let node = catalog.node(id);
    let pad = "  ".repeat(indent);
    let aliases = node.representations().join(", ");
    let default = node
        .default_query()
        .map(|d| format!("  (default: {})", catalog.node(d).key()))
        .unwrap_or_default();
    println!("{pad}{}  [{aliases}]{default}", node.key());
    for parameter in node.parameters() {
        let mut flags = Vec::new();
        if parameter.is_optional() {
            flags.push("optional");
        }
        if parameter.is_repeatable() {
            flags.push("repeatable");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!("  ({})", flags.join(", "))
        };
        println!("{pad}  <{}>{flags}", parameter.key());
    }
    for option in node.options() {
        let short = option.short().map(|c| format!(" | -{c}")).unwrap_or_default();
        let value = if option.parameters().is_empty() {
            String::new()
        } else {
            " <value>".to_string()
        };
        println!("{pad}  --{}{short}{value}", option.key());
    }
    for &child in node.children() {
        print_node(catalog, child, indent + 1);
    }
}

fn cmd_repl(catalog: &Catalog, format: Format) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let resolution = resolve(trimmed, catalog);
        render_resolution(trimmed, &resolution, format);
        stdout.flush().ok();
    }
    Ok(())
}

fn cmd_explain(id: &str) -> Result<()> {
    match explain(id) {
        Some(text) => {
            println!("{id}: {text}");
            Ok(())
        }
        None => {
            eprintln!("error: unknown diagnostic ID '{id}'");
            process::exit(1);
        }
    }
}
