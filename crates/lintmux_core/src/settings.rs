//! The settings seam.
//!
//! Checker settings are plain JSON maps: a definition ships defaults, the
//! embedding editor overrides them per checker name. The engine only reads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read-only access to the editor's plugin settings.
pub trait SettingsProvider: Send + Sync {
    /// Per-checker overrides for the named checker, empty if none.
    fn plugin_settings(&self, name: &str) -> Map<String, Value>;

    /// A process-wide setting, if set.
    fn global(&self, key: &str) -> Option<Value>;
}

/// Map-backed settings, for embedding and tests.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StaticSettings {
    /// Per-checker settings, keyed by checker name.
    #[serde(default)]
    pub plugins: HashMap<String, Map<String, Value>>,

    /// Process-wide settings.
    #[serde(default)]
    pub globals: Map<String, Value>,
}

impl StaticSettings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one override for the named checker.
    pub fn set_plugin(&mut self, name: impl Into<String>, key: impl Into<String>, value: Value) {
        self.plugins
            .entry(name.into())
            .or_default()
            .insert(key.into(), value);
    }
}

impl SettingsProvider for StaticSettings {
    fn plugin_settings(&self, name: &str) -> Map<String, Value> {
        self.plugins.get(name).cloned().unwrap_or_default()
    }

    fn global(&self, key: &str) -> Option<Value> {
        self.globals.get(key).cloned()
    }
}

/// Whether a settings value counts as enabled.
///
/// Mirrors the truthiness the original settings store used: absent, `false`,
/// `null`, `0` and `""` are all off.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
