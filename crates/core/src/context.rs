//! The immutable resolved context and its staged builder.
//!
//! Resolution accumulates into a [`ContextBuilder`] (mutable, never handed
//! to consumers) and is frozen into a [`ResolvedContext`] snapshot by one
//! explicit [`ContextBuilder::freeze`] call. Freezing copies the
//! accumulated state, so later mutation of the builder never affects an
//! already-frozen context, and a renderer holding a stale context is always
//! safe. Two frozen contexts are never the same allocation even when built
//! from identical input.

use serde::Serialize;
use std::collections::BTreeMap;

const NO_VALUES: &[String] = &[];

/// Values bound to one parameter slot.
///
/// Non-repeatable slots hold exactly one value; repeatable slots hold the
/// matched values in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterContext {
    key: String,
    values: Vec<String>,
}

impl ParameterContext {
    /// Create an empty binding for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
        }
    }

    /// The parameter key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The first bound value, or `""` when nothing bound.
    pub fn value(&self) -> &str {
        self.values.first().map_or("", String::as_str)
    }

    /// All bound values in input order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Append a bound value.
    pub fn push_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }
}

/// One bound option with the values of its own parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContext {
    key: String,
    /// The option's own parameter bindings, in declaration order.
    parameters: Vec<ParameterContext>,
}

impl OptionContext {
    /// Create a flag-style binding for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            parameters: Vec::new(),
        }
    }

    /// The option key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The option's parameter bindings in declaration order.
    pub fn parameters(&self) -> &[ParameterContext] {
        &self.parameters
    }

    /// The first value of the option's first parameter, or `""`.
    ///
    /// This is the common accessor for `--name value` style options.
    pub fn value(&self) -> &str {
        self.parameters.first().map_or("", ParameterContext::value)
    }

    /// Bind `value` under the option's parameter `key`, creating the
    /// binding on first use.
    pub fn bind_parameter(&mut self, key: &str, value: impl Into<String>) {
        match self.parameters.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.push_value(value),
            None => {
                let mut ctx = ParameterContext::new(key);
                ctx.push_value(value);
                self.parameters.push(ctx);
            }
        }
    }
}

/// The frozen, immutable outcome of one resolution.
///
/// Consumed by executors and renderers; never mutated after creation. A
/// re-resolution (e.g. the next keystroke) produces a brand-new context
/// rather than mutating the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContext {
    key: String,
    is_valid: bool,
    query_path: Vec<String>,
    options: BTreeMap<String, OptionContext>,
    parameters: BTreeMap<String, ParameterContext>,
}

impl ResolvedContext {
    /// An empty, invalid context (no query matched).
    pub fn empty() -> Self {
        Self {
            key: String::new(),
            is_valid: false,
            query_path: Vec::new(),
            options: BTreeMap::new(),
            parameters: BTreeMap::new(),
        }
    }

    /// Key of the resolved leaf query, or `""` when nothing matched.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the input resolved to a complete, well-shaped command.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Ordered query keys from root to leaf.
    pub fn query_path(&self) -> &[String] {
        &self.query_path
    }

    /// The first (root) query key, or `""` when the path is empty.
    pub fn first_query(&self) -> &str {
        self.query_path.first().map_or("", String::as_str)
    }

    /// Whether the option was bound.
    pub fn has_option(&self, option_key: &str) -> bool {
        self.options.contains_key(option_key)
    }

    /// The bound option, if present.
    pub fn option(&self, option_key: &str) -> Option<&OptionContext> {
        self.options.get(option_key)
    }

    /// The value bound to the option's own parameter, or `""` when the
    /// option is absent or flag-style.
    pub fn option_value(&self, option_key: &str) -> &str {
        self.options
            .get(option_key)
            .map_or("", OptionContext::value)
    }

    /// All bound options, keyed by option key.
    pub fn options(&self) -> &BTreeMap<String, OptionContext> {
        &self.options
    }

    /// Whether the parameter received at least one value.
    pub fn has_parameter(&self, parameter_key: &str) -> bool {
        self.parameters.contains_key(parameter_key)
    }

    /// The first value bound to the parameter, or `""`.
    pub fn parameter_value(&self, parameter_key: &str) -> &str {
        self.parameters
            .get(parameter_key)
            .map_or("", ParameterContext::value)
    }

    /// All values bound to the parameter (for repeatable slots), in input
    /// order. Empty when the parameter is absent.
    pub fn parameter_values(&self, parameter_key: &str) -> &[String] {
        self.parameters
            .get(parameter_key)
            .map_or(NO_VALUES, ParameterContext::values)
    }

    /// All bound parameters, keyed by parameter key.
    pub fn parameters(&self) -> &BTreeMap<String, ParameterContext> {
        &self.parameters
    }

    /// Start a new builder seeded with this context's state, for staged
    /// composition or partial re-use.
    pub fn to_builder(&self) -> ContextBuilder {
        ContextBuilder {
            key: self.key.clone(),
            is_valid: self.is_valid,
            query_path: self.query_path.clone(),
            options: self.options.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

/// Mutable accumulator for a resolution in progress.
///
/// Writable, not read by consumers; produce the consumer-facing snapshot
/// with [`ContextBuilder::freeze`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    key: String,
    is_valid: bool,
    query_path: Vec<String>,
    options: BTreeMap<String, OptionContext>,
    parameters: BTreeMap<String, ParameterContext>,
}

impl ContextBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the leaf query key.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    /// Set the overall validity flag.
    pub fn set_valid(&mut self, is_valid: bool) {
        self.is_valid = is_valid;
    }

    /// Append a query key to the path (root to leaf order).
    pub fn push_query(&mut self, key: impl Into<String>) {
        self.query_path.push(key.into());
    }

    /// Record a bound option. A repeated option replaces the earlier
    /// binding under the same key.
    pub fn bind_option(&mut self, option: OptionContext) {
        self.options.insert(option.key.clone(), option);
    }

    /// Bind `value` under the positional parameter `key`, appending when
    /// the key is already bound (repeatable slots).
    pub fn bind_parameter(&mut self, key: &str, value: impl Into<String>) {
        self.parameters
            .entry(key.to_string())
            .or_insert_with(|| ParameterContext::new(key))
            .push_value(value);
    }

    /// Whether the positional parameter has at least one bound value.
    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    /// Snapshot the accumulated state into an immutable context.
    ///
    /// The builder stays usable afterward; further mutation never affects
    /// the returned snapshot.
    pub fn freeze(&self) -> ResolvedContext {
        ResolvedContext {
            key: self.key.clone(),
            is_valid: self.is_valid,
            query_path: self.query_path.clone(),
            options: self.options.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freeze_snapshots_builder_state() {
        let mut builder = ContextBuilder::new();
        builder.push_query("environment");
        builder.push_query("get");
        builder.set_key("get");
        builder.bind_parameter("name", "PATH");
        builder.set_valid(true);

        let frozen = builder.freeze();
        builder.bind_parameter("name", "HOME");
        builder.set_valid(false);

        assert!(frozen.is_valid());
        assert_eq!(frozen.parameter_values("name"), ["PATH"]);
        assert_eq!(frozen.query_path(), ["environment", "get"]);
        assert_eq!(frozen.first_query(), "environment");
    }

    #[test]
    fn freezing_twice_yields_equal_independent_contexts() {
        let mut builder = ContextBuilder::new();
        builder.set_key("help");
        builder.push_query("help");
        builder.set_valid(true);

        let a = builder.freeze();
        let b = builder.freeze();
        assert_eq!(a, b, "field-for-field equal");
        assert_ne!(a.query_path().as_ptr(), b.query_path().as_ptr());
    }

    #[test]
    fn missing_lookups_return_empty() {
        let ctx = ResolvedContext::empty();
        assert!(!ctx.is_valid());
        assert_eq!(ctx.key(), "");
        assert_eq!(ctx.first_query(), "");
        assert!(!ctx.has_option("force"));
        assert_eq!(ctx.option_value("force"), "");
        assert!(!ctx.has_parameter("path"));
        assert_eq!(ctx.parameter_value("path"), "");
        assert!(ctx.parameter_values("path").is_empty());
    }

    #[test]
    fn option_context_binds_values_in_order() {
        let mut opt = OptionContext::new("name");
        opt.bind_parameter("value", "a");
        opt.bind_parameter("value", "b");
        assert_eq!(opt.value(), "a");
        assert_eq!(opt.parameters()[0].values(), ["a", "b"]);
    }

    #[test]
    fn to_builder_round_trips() {
        let mut builder = ContextBuilder::new();
        builder.set_key("list");
        builder.push_query("environment");
        builder.push_query("list");
        builder.bind_option(OptionContext::new("verbose"));
        builder.set_valid(true);
        let frozen = builder.freeze();

        let again = frozen.to_builder().freeze();
        assert_eq!(frozen, again);
    }

    #[test]
    fn serializes_camel_case() {
        let mut builder = ContextBuilder::new();
        builder.set_key("cd");
        builder.push_query("cd");
        builder.set_valid(true);
        let json = serde_json::to_string(&builder.freeze()).unwrap();
        assert!(json.contains("\"isValid\":true"), "{json}");
        assert!(json.contains("\"queryPath\":[\"cd\"]"), "{json}");
    }
}
