//! The resolver: walks tokens against the catalog tree.
//!
//! One [`resolve`] call is a complete resolution: tokenize, descend the
//! query tree, bind options and parameters, freeze the context. The call
//! is synchronous, allocation-local, and total — malformed input yields
//! `is_valid = false` plus diagnostic tokens, never an error. The same
//! routine runs on every keystroke (live suggestions) and on submit
//! (execution), so partial and complete input take the identical path.

use crate::context::{ContextBuilder, OptionContext, ResolvedContext};
use crate::tokenizer::{LexKind, Token, tokenize};
use conch_catalog::{Catalog, NodeId, OptionSlot, ParameterSlot};
use conch_diagnostics::{Diagnostic, Span, codes};
use serde::Serialize;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Final semantic classification of a token, assigned during resolution.
///
/// The provisional [`LexKind`] is kept alongside so the two-phase
/// classification stays auditable: a `Word` may end up `Query`,
/// `Parameter`, `OptionValue`, or `Unknown` depending on scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemKind {
    /// Matched a query representation and extended the query path.
    Query,
    /// Matched a long option registered in the resolved scope.
    OptionLong,
    /// A short-option bundle whose characters all matched.
    OptionShort,
    /// Consumed as the value of a preceding option.
    OptionValue,
    /// Bound to a positional parameter slot.
    Parameter,
    /// Well-formed but unmatched after resolution.
    Unknown,
    /// Malformed, or a bundle containing an unregistered character.
    Wrong,
}

/// A token with both classification phases and its source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedToken {
    /// Provisional lexical classification from the tokenizer.
    pub lex: LexKind,
    /// Final semantic classification from the resolver.
    pub sem: SemKind,
    /// The raw token text.
    pub text: String,
    /// Byte span in the input.
    pub span: Span,
}

/// The complete outcome of one resolution call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// The frozen command context.
    pub context: ResolvedContext,
    /// Every input token with its final classification, for inline
    /// feedback (highlighting, underlining).
    pub tokens: Vec<ClassifiedToken>,
    /// Diagnostics produced during resolution.
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve `input` against the catalog.
///
/// Deterministic and total: the same input and catalog always yield a
/// field-for-field equal [`Resolution`], and no input shape causes an
/// error. Each call re-tokenizes and re-walks the catalog from scratch —
/// an explicit simplicity-over-throughput choice, since inputs are short
/// and catalogs small.
pub fn resolve(input: &str, catalog: &Catalog) -> Resolution {
    Resolver::new(input, catalog).resolve()
}

// ─── Resolver implementation ────────────────────────────────────────────────

struct Resolver<'a> {
    input: &'a str,
    catalog: &'a Catalog,
    toks: Vec<Token<'a>>,
    /// Parallel to `toks`; finalized during resolution.
    sems: Vec<SemKind>,
    pos: usize,
    diags: Vec<Diagnostic>,
    builder: ContextBuilder,
    /// Current scope node; `None` while still at the root forest.
    scope: Option<NodeId>,
    /// Index of the next unfilled parameter slot in the scope.
    param_index: usize,
    valid: bool,
}

impl<'a> Resolver<'a> {
    fn new(input: &'a str, catalog: &'a Catalog) -> Self {
        let toks = tokenize(input);
        let sems = vec![SemKind::Unknown; toks.len()];
        Self {
            input,
            catalog,
            toks,
            sems,
            pos: 0,
            diags: Vec::new(),
            builder: ContextBuilder::new(),
            scope: None,
            param_index: 0,
            valid: true,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn resolve(mut self) -> Resolution {
        self.match_queries();
        self.bind_remaining();
        self.finalize()
    }

    // ── Phase 1: query descent ──────────────────────────────────────────

    /// Extend the query path while tokens keep matching child queries,
    /// falling back to default sub-queries without consuming the token.
    /// Once this phase ends, resolution never returns to query matching:
    /// a later bare token that happens to spell a child representation is
    /// treated as a positional value.
    fn match_queries(&mut self) {
        let catalog = self.catalog;
        // Total default-hop bound per resolution. The builder rejects
        // dangling defaults, and defaults point strictly downward in the
        // tree, so this guard only matters for a misconfigured catalog.
        let mut default_hops = 0usize;
        while !self.at_end() {
            let tok = &self.toks[self.pos];
            if tok.lex == LexKind::Word {
                let child = match self.scope {
                    None => catalog.find_root(tok.text),
                    Some(id) => catalog.node(id).find_query(tok.text),
                };
                if let Some(child) = child {
                    self.sems[self.pos] = SemKind::Query;
                    self.builder.push_query(catalog.node(child).key());
                    self.scope = Some(child);
                    self.pos += 1;
                    continue;
                }
            }
            // The token cannot extend the path directly; descend into the
            // default branch and re-evaluate it against the new scope.
            if let Some(id) = self.scope
                && let Some(default) = catalog.node(id).default_query()
                && default_hops < catalog.max_depth()
            {
                self.builder.push_query(catalog.node(default).key());
                self.scope = Some(default);
                default_hops += 1;
                continue;
            }
            break;
        }
    }

    // ── Phase 2: binding ────────────────────────────────────────────────

    fn bind_remaining(&mut self) {
        let Some(scope) = self.scope else {
            self.mark_unmatched_root();
            return;
        };
        while !self.at_end() {
            match self.toks[self.pos].lex {
                LexKind::Wrong => self.mark_malformed(),
                LexKind::LongOption => self.bind_long_option(scope),
                LexKind::ShortBundle => self.bind_short_bundle(scope),
                LexKind::Word => self.bind_word(scope),
            }
        }
    }

    /// No query matched at all: classify everything as unmatched. Only the
    /// first word gets a diagnostic; the rest are consequences of the same
    /// problem and extra reports would just be noise.
    fn mark_unmatched_root(&mut self) {
        let mut first_word = true;
        while !self.at_end() {
            let tok = &self.toks[self.pos];
            match tok.lex {
                LexKind::Wrong => {
                    self.sems[self.pos] = SemKind::Wrong;
                    self.diags.push(Diagnostic::error(
                        codes::MALFORMED_TOKEN,
                        format!("incomplete token '{}'", tok.text),
                        Some(tok.span()),
                    ));
                }
                LexKind::Word if first_word => {
                    first_word = false;
                    self.sems[self.pos] = SemKind::Unknown;
                    self.diags.push(
                        Diagnostic::error(
                            codes::UNKNOWN_QUERY,
                            format!("unknown command '{}'", tok.text),
                            Some(tok.span()),
                        )
                        .with_context(ctx!("word" => tok.text)),
                    );
                }
                _ => self.sems[self.pos] = SemKind::Unknown,
            }
            self.valid = false;
            self.pos += 1;
        }
    }

    fn mark_malformed(&mut self) {
        let tok = &self.toks[self.pos];
        self.sems[self.pos] = SemKind::Wrong;
        self.diags.push(Diagnostic::error(
            codes::MALFORMED_TOKEN,
            format!("incomplete token '{}'", tok.text),
            Some(tok.span()),
        ));
        self.valid = false;
        self.pos += 1;
    }

    fn bind_long_option(&mut self, scope: NodeId) {
        let catalog = self.catalog;
        let node = catalog.node(scope);
        let tok = &self.toks[self.pos];
        let rep = &tok.text[2..];
        let span = tok.span();
        match node.option_by_representation(rep) {
            Some(slot) => {
                self.sems[self.pos] = SemKind::OptionLong;
                self.pos += 1;
                let bound = self.bind_option_values(slot, span);
                self.builder.bind_option(bound);
            }
            None => {
                // Non-fatal for the rest of the parse: keep binding the
                // remaining tokens so live feedback shows the structure.
                self.sems[self.pos] = SemKind::Unknown;
                self.diags.push(
                    Diagnostic::error(
                        codes::UNKNOWN_OPTION,
                        format!("unknown option '--{rep}' on '{}'", node.key()),
                        Some(span),
                    )
                    .with_context(ctx!("option" => rep, "query" => node.key())),
                );
                self.valid = false;
                self.pos += 1;
            }
        }
    }

    fn bind_short_bundle(&mut self, scope: NodeId) {
        let catalog = self.catalog;
        let node = catalog.node(scope);
        let tok = &self.toks[self.pos];
        let bundle = &tok.text[1..];
        let tok_start = tok.start;
        let tok_span = tok.span();
        let last = bundle.chars().count() - 1;

        let mut any_wrong = false;
        // The last character's slot may take a value from the following
        // token; every other position binds flag-style.
        let mut trailing_slot: Option<&OptionSlot> = None;

        for (i, (off, c)) in bundle.char_indices().enumerate() {
            let span = Span::new(tok_start + 1 + off, tok_start + 1 + off + c.len_utf8());
            match node.option_by_char(c) {
                Some(slot) => {
                    if i == last && !slot.parameters().is_empty() {
                        trailing_slot = Some(slot);
                    } else {
                        self.bind_flag_style(slot, span);
                    }
                }
                None => {
                    any_wrong = true;
                    self.valid = false;
                    self.diags.push(
                        Diagnostic::error(
                            codes::UNKNOWN_SHORT_OPTION,
                            format!("unknown short option '-{c}' on '{}'", node.key()),
                            Some(span),
                        )
                        .with_context(ctx!("short" => c.to_string(), "query" => node.key())),
                    );
                }
            }
        }

        self.sems[self.pos] = if any_wrong {
            SemKind::Wrong
        } else {
            SemKind::OptionShort
        };
        self.pos += 1;

        if let Some(slot) = trailing_slot {
            let bound = self.bind_option_values(slot, tok_span);
            self.builder.bind_option(bound);
        }
    }

    /// Bind an option with no chance of consuming a value (mid-bundle
    /// position). A required option parameter can never be satisfied here.
    fn bind_flag_style(&mut self, slot: &OptionSlot, span: Span) {
        for param in slot.parameters() {
            if !param.is_optional() {
                self.diags.push(
                    Diagnostic::error(
                        codes::MISSING_OPTION_VALUE,
                        format!(
                            "option '{}' requires a value for '{}'",
                            slot.key(),
                            param.key()
                        ),
                        Some(span),
                    )
                    .with_context(ctx!("option" => slot.key(), "parameter" => param.key())),
                );
                self.valid = false;
            }
        }
        self.builder.bind_option(OptionContext::new(slot.key()));
    }

    /// Consume following word tokens as the option's own parameter values,
    /// one per declared slot in order.
    fn bind_option_values(&mut self, slot: &OptionSlot, option_span: Span) -> OptionContext {
        let mut bound = OptionContext::new(slot.key());
        for param in slot.parameters() {
            if !self.at_end() && self.toks[self.pos].lex == LexKind::Word {
                let text = self.toks[self.pos].text;
                let span = self.toks[self.pos].span();
                self.check_shape(param, text, span, Some(slot.key()));
                self.sems[self.pos] = SemKind::OptionValue;
                bound.bind_parameter(param.key(), text);
                self.pos += 1;
            } else if !param.is_optional() {
                self.diags.push(
                    Diagnostic::error(
                        codes::MISSING_OPTION_VALUE,
                        format!(
                            "option '{}' requires a value for '{}'",
                            slot.key(),
                            param.key()
                        ),
                        Some(option_span),
                    )
                    .with_context(ctx!("option" => slot.key(), "parameter" => param.key())),
                );
                self.valid = false;
            }
        }
        bound
    }

    fn bind_word(&mut self, scope: NodeId) {
        let catalog = self.catalog;
        let node = catalog.node(scope);
        let text = self.toks[self.pos].text;
        let span = self.toks[self.pos].span();
        let params = node.parameters();
        if self.param_index >= params.len() {
            self.sems[self.pos] = SemKind::Unknown;
            self.diags.push(
                Diagnostic::error(
                    codes::UNEXPECTED_PARAMETER,
                    format!("unexpected value '{text}' on '{}'", node.key()),
                    Some(span),
                )
                .with_context(ctx!("query" => node.key(), "value" => text)),
            );
            self.valid = false;
            self.pos += 1;
            return;
        }
        let slot = &params[self.param_index];
        self.check_shape(slot, text, span, None);
        self.sems[self.pos] = SemKind::Parameter;
        self.builder.bind_parameter(slot.key(), text);
        self.pos += 1;
        // A repeatable slot keeps consuming bare tokens; any other slot is
        // filled by a single value.
        if !slot.is_repeatable() {
            self.param_index += 1;
        }
    }

    /// Validate a value against its slot's shape pattern. A mismatch keeps
    /// the binding but invalidates the resolution, so live-typing feedback
    /// still shows the rest of the structure.
    fn check_shape(&mut self, slot: &ParameterSlot, text: &str, span: Span, option: Option<&str>) {
        if slot.accepts(text) {
            return;
        }
        let template = slot.template().map_or("", |t| t.source());
        let mut context = ctx!(
            "parameter" => slot.key(),
            "value" => text,
            "template" => template,
        );
        if let Some(option_key) = option {
            context.insert("option".into(), option_key.into());
        }
        self.diags.push(
            Diagnostic::error(
                codes::PARAMETER_SHAPE_MISMATCH,
                format!("value '{text}' does not match shape of '{}'", slot.key()),
                Some(span),
            )
            .with_context(context),
        );
        self.valid = false;
    }

    // ── Phase 3: finalization ───────────────────────────────────────────

    fn finalize(mut self) -> Resolution {
        match self.scope {
            Some(id) => {
                let node = self.catalog.node(id);
                self.builder.set_key(node.key());
                for slot in node.parameters() {
                    if !slot.is_optional() && !self.builder.has_parameter(slot.key()) {
                        self.diags.push(
                            Diagnostic::error(
                                codes::MISSING_REQUIRED_PARAMETER,
                                format!(
                                    "missing required parameter '{}' of '{}'",
                                    slot.key(),
                                    node.key()
                                ),
                                Some(Span::empty(self.input.len())),
                            )
                            .with_context(
                                ctx!("parameter" => slot.key(), "query" => node.key()),
                            ),
                        );
                        self.valid = false;
                    }
                }
            }
            None => self.valid = false,
        }
        self.builder.set_valid(self.valid);

        let tokens = self
            .toks
            .iter()
            .zip(&self.sems)
            .map(|(tok, &sem)| ClassifiedToken {
                lex: tok.lex,
                sem,
                text: tok.text.to_string(),
                span: tok.span(),
            })
            .collect();

        Resolution {
            context: self.builder.freeze(),
            tokens,
            diagnostics: self.diags,
        }
    }
}
