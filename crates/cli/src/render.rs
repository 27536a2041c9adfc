//! Pretty output for resolutions and diagnostics.
//!
//! Converts the engine's [`Diagnostic`] type into ariadne reports for
//! coloured, input-annotated terminal output, and renders the resolved
//! context as a compact summary. Falls back to structured JSON when the
//! output is piped or when the user explicitly requests it.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use conch_core::{Resolution, ResolvedContext};
use conch_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for resolution rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, input-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` choice, defaulting to pretty for
    /// interactive terminals and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

// ── Context rendering ───────────────────────────────────────────────────

/// Print a compact human-readable summary of a resolved context to stdout.
pub(crate) fn print_context(ctx: &ResolvedContext) {
    use ariadne::Fmt;

    let verdict = if ctx.is_valid() {
        "valid".fg(Color::Green).to_string()
    } else {
        "invalid".fg(Color::Red).to_string()
    };
    if ctx.query_path().is_empty() {
        println!("no command matched ({verdict})");
    } else {
        println!("{} ({verdict})", ctx.query_path().join(" > "));
    }
    for (key, option) in ctx.options() {
        if option.value().is_empty() {
            println!("  --{key}");
        } else {
            println!("  --{key} = {}", option.value());
        }
    }
    for (key, parameter) in ctx.parameters() {
        println!("  {key} = {}", parameter.values().join(", "));
    }
}

// ── Diagnostic rendering ────────────────────────────────────────────────

/// Render a slice of diagnostics in pretty (ariadne) format to stderr.
///
/// Diagnostics with a span are rendered with input context (underlines,
/// labels). Those without a span are rendered as standalone messages.
pub(crate) fn render_diagnostics_pretty(input: &str, diagnostics: &[Diagnostic]) {
    const SOURCE_NAME: &str = "<input>";

    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default().with_compact(false);
    let mut cache = (SOURCE_NAME, Source::from(input));

    for diag in diagnostics {
        if let Some(span) = &diag.span {
            // Clamp to input length to avoid panics on truncated input.
            let start = span.start.min(input.len());
            let end = span.end.min(input.len()).max(start);

            let mut builder = Report::build(report_kind(&diag.severity), (SOURCE_NAME, start..end))
                .with_code(diag.id.as_ref())
                .with_message(&diag.message)
                .with_config(config);

            builder = builder.with_label(
                Label::new((SOURCE_NAME, start..end))
                    .with_message(label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );

            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }

            builder.finish().eprint(&mut cache).ok();
        } else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// Build a concise inline label from diagnostic context, falling back to
/// the full message when no structured context is present.
fn label_message(diag: &Diagnostic) -> String {
    if let Some(ctx) = &diag.context
        && !ctx.is_empty()
    {
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        diag.message.clone()
    }
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Render a full resolution in the given format.
///
/// - `Pretty` → context summary to stdout, diagnostics to stderr.
/// - `Json`   → one JSON envelope (`context`, `tokens`, `diagnostics`) to
///   stdout.
pub(crate) fn render_resolution(input: &str, resolution: &Resolution, format: Format) {
    match format {
        Format::Pretty => {
            print_context(&resolution.context);
            render_diagnostics_pretty(input, &resolution.diagnostics);
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(resolution)
                .expect("Resolution serialization cannot fail");
            println!("{json}");
        }
    }
}
