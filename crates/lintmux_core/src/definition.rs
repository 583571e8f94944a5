//! Declarative checker definitions.
//!
//! A definition describes one external checker: the syntaxes it handles,
//! how to invoke it, and how to read its output. Definitions are built once
//! at startup through [`CheckerDefinition::builder`] and registered
//! explicitly; after registration only the cached effective settings ever
//! change.

use std::collections::HashSet;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::warn;

use lintmux_checker::OutputPattern;

use crate::settings::SettingsProvider;

/// Static description of one external checker.
#[derive(Debug)]
pub struct CheckerDefinition {
    name: String,
    syntaxes: HashSet<String>,
    command: Vec<String>,
    pattern_source: Option<String>,
    pattern: Option<OutputPattern>,
    multiline: bool,
    tab_size: usize,
    scope: String,
    selector: Option<String>,
    outline: bool,
    needs_exclusive_host: bool,
    defaults: Map<String, Value>,
    effective_settings: RwLock<Option<Map<String, Value>>>,
}

impl CheckerDefinition {
    /// Starts building a definition with the given name.
    pub fn builder(name: impl Into<String>) -> CheckerDefinitionBuilder {
        CheckerDefinitionBuilder::new(name)
    }

    /// The checker's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive exact match against the declared syntax set.
    ///
    /// False when the definition declares no syntax at all.
    pub fn can_lint(&self, syntax: &str) -> bool {
        !self.syntaxes.is_empty() && self.syntaxes.contains(&syntax.to_lowercase())
    }

    /// The invocation argv template.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The compiled output pattern, if compilation succeeded.
    ///
    /// A definition whose declared pattern failed to compile stays
    /// registered but is disabled for matching; this returns `None` then.
    pub fn pattern(&self) -> Option<&OutputPattern> {
        self.pattern.as_ref()
    }

    /// Whether a pattern source was declared at all, compiled or not.
    pub fn pattern_declared(&self) -> bool {
        self.pattern_source.is_some()
    }

    /// Whether the pattern runs against the whole output at once.
    pub fn multiline(&self) -> bool {
        self.multiline
    }

    /// Whether this definition can be linted at all.
    ///
    /// Missing syntax, command or pattern source is a structural defect of
    /// the definition, surfaced as `IncompleteDefinition` at lint time.
    pub fn is_complete(&self) -> bool {
        !self.syntaxes.is_empty() && !self.command.is_empty() && self.pattern_source.is_some()
    }

    /// Tab width the checker measured columns with.
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Visual category for highlight regions.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The embedded-sub-language selector, if this checker is restricted
    /// to sections.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Whether highlight regions are drawn as outlines.
    pub fn outline(&self) -> bool {
        self.outline
    }

    /// Whether lint runs must rendezvous with the host context.
    pub fn needs_exclusive_host(&self) -> bool {
        self.needs_exclusive_host
    }

    /// The declared default settings.
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Effective settings: defaults overridden by the provider's values.
    ///
    /// Served from the cache populated by [`refresh_settings`], falling back
    /// to a fresh computation when `reload` has not run yet.
    ///
    /// [`refresh_settings`]: CheckerDefinition::refresh_settings
    pub fn settings(&self, provider: &dyn SettingsProvider) -> Map<String, Value> {
        if let Some(cached) = self.effective_settings.read().as_ref() {
            return cached.clone();
        }
        self.compute_settings(provider)
    }

    /// Recomputes and caches the effective settings.
    pub fn refresh_settings(&self, provider: &dyn SettingsProvider) {
        *self.effective_settings.write() = Some(self.compute_settings(provider));
    }

    fn compute_settings(&self, provider: &dyn SettingsProvider) -> Map<String, Value> {
        let mut settings = self.defaults.clone();
        for (key, value) in provider.plugin_settings(&self.name) {
            settings.insert(key, value);
        }
        settings
    }
}

/// Builder for [`CheckerDefinition`].
#[derive(Debug, Default)]
pub struct CheckerDefinitionBuilder {
    name: String,
    syntaxes: HashSet<String>,
    command: Vec<String>,
    pattern_source: Option<String>,
    multiline: bool,
    tab_size: usize,
    scope: Option<String>,
    selector: Option<String>,
    outline: bool,
    needs_exclusive_host: bool,
    defaults: Map<String, Value>,
}

impl CheckerDefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tab_size: 1,
            outline: true,
            ..Self::default()
        }
    }

    /// Adds one handled syntax.
    pub fn syntax(mut self, syntax: impl AsRef<str>) -> Self {
        self.syntaxes.insert(syntax.as_ref().to_lowercase());
        self
    }

    /// Adds several handled syntaxes.
    pub fn syntaxes<I, S>(mut self, syntaxes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for syntax in syntaxes {
            self.syntaxes.insert(syntax.as_ref().to_lowercase());
        }
        self
    }

    /// Sets the invocation argv template.
    pub fn command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output pattern source.
    pub fn pattern(mut self, source: impl Into<String>) -> Self {
        self.pattern_source = Some(source.into());
        self
    }

    /// Runs the pattern against the whole output instead of per line.
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Sets the tab width the checker measures columns with (min 1).
    pub fn tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Sets the visual scope for highlight regions.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Restricts this checker to embedded sections with the given selector.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Sets whether highlight regions are drawn as outlines.
    pub fn outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    /// Requires the exclusive-host rendezvous for every lint run.
    pub fn needs_exclusive_host(mut self, needs: bool) -> Self {
        self.needs_exclusive_host = needs;
        self
    }

    /// Sets the default settings map.
    pub fn defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets one default setting.
    pub fn default_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Builds the definition, compiling the output pattern.
    ///
    /// A pattern that fails to compile is logged and dropped; the definition
    /// is still usable for settings and UI but disabled for matching.
    pub fn build(self) -> CheckerDefinition {
        let pattern = self.pattern_source.as_deref().and_then(|source| {
            match OutputPattern::compile(source, self.multiline) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Error compiling pattern for '{}': {}", self.name, e);
                    None
                }
            }
        });

        CheckerDefinition {
            name: self.name,
            syntaxes: self.syntaxes,
            command: self.command,
            pattern_source: self.pattern_source,
            pattern,
            multiline: self.multiline,
            tab_size: self.tab_size,
            scope: self.scope.unwrap_or_else(|| "keyword".to_string()),
            selector: self.selector,
            outline: self.outline,
            needs_exclusive_host: self.needs_exclusive_host,
            defaults: self.defaults,
            effective_settings: RwLock::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::settings::StaticSettings;

    use super::*;

    fn pyflakes() -> CheckerDefinition {
        CheckerDefinition::builder("pyflakes")
            .syntax("Python")
            .command(["pyflakes"])
            .pattern(r"[^:]+:(?P<line>\d+): (?P<error>.+)")
            .build()
    }

    #[rstest]
    #[case("python", true)]
    #[case("Python", true)]
    #[case("PYTHON", true)]
    #[case("ruby", false)]
    #[case("", false)]
    fn test_can_lint_is_case_insensitive(#[case] syntax: &str, #[case] expected: bool) {
        assert_eq!(pyflakes().can_lint(syntax), expected);
    }

    #[test]
    fn test_can_lint_without_syntaxes_is_false() {
        let def = CheckerDefinition::builder("anon").build();
        assert!(!def.can_lint("python"));
    }

    #[test]
    fn test_multiple_syntaxes() {
        let def = CheckerDefinition::builder("htmltidy")
            .syntaxes(["HTML", "HTML 5"])
            .build();

        assert!(def.can_lint("html"));
        assert!(def.can_lint("html 5"));
        assert!(!def.can_lint("xml"));
    }

    #[test]
    fn test_complete_definition() {
        assert!(pyflakes().is_complete());
    }

    #[test]
    fn test_incomplete_without_command() {
        let def = CheckerDefinition::builder("x")
            .syntax("python")
            .pattern(r"(?P<line>\d+)")
            .build();
        assert!(!def.is_complete());
    }

    #[test]
    fn test_bad_pattern_disables_matching_but_keeps_definition() {
        let def = CheckerDefinition::builder("broken")
            .syntax("python")
            .command(["broken"])
            .pattern(r"(?P<line>[")
            .build();

        // Still registered-shaped and complete, but disabled for matching.
        assert!(def.is_complete());
        assert!(def.pattern_declared());
        assert!(def.pattern().is_none());
    }

    #[test]
    fn test_tab_size_clamps_to_one() {
        let def = CheckerDefinition::builder("x").tab_size(0).build();
        assert_eq!(def.tab_size(), 1);
    }

    #[test]
    fn test_settings_defaults_overridden_by_provider() {
        let def = CheckerDefinition::builder("pyflakes")
            .syntax("python")
            .command(["pyflakes"])
            .default_setting("strict", json!(false))
            .default_setting("ignore", json!(["E501"]))
            .build();

        let mut provider = StaticSettings::new();
        provider.set_plugin("pyflakes", "strict", json!(true));

        let settings = def.settings(&provider);
        assert_eq!(settings.get("strict"), Some(&json!(true)));
        assert_eq!(settings.get("ignore"), Some(&json!(["E501"])));
    }

    #[test]
    fn test_refresh_settings_caches() {
        let def = pyflakes();
        let mut provider = StaticSettings::new();
        provider.set_plugin("pyflakes", "disable", json!(true));
        def.refresh_settings(&provider);

        // The cache answers even when queried with different settings.
        let empty = StaticSettings::new();
        let settings = def.settings(&empty);
        assert_eq!(settings.get("disable"), Some(&json!(true)));
    }

    #[test]
    fn test_default_scope_and_outline() {
        let def = pyflakes();
        assert_eq!(def.scope(), "keyword");
        assert!(def.outline());
    }
}
