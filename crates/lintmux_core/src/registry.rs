//! The process-wide checker registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::CheckerDefinition;
use crate::error::LintError;

/// All known checker definitions, keyed by name.
///
/// Registration replaces the original's register-on-declaration hook: each
/// checker module calls [`CheckerRegistry::register`] exactly once at
/// startup. Re-registration during a reload must go through
/// [`CheckerRegistry::replace`] instead.
#[derive(Debug, Default)]
pub struct CheckerRegistry {
    definitions: HashMap<String, Arc<CheckerDefinition>>,
}

impl CheckerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its name.
    ///
    /// Fails when the name is already taken.
    pub fn register(&mut self, definition: CheckerDefinition) -> Result<(), LintError> {
        let name = definition.name().to_string();
        if self.definitions.contains_key(&name) {
            return Err(LintError::DuplicateDefinition(name));
        }
        self.definitions.insert(name, Arc::new(definition));
        Ok(())
    }

    /// Replaces a definition, returning the previous one if any.
    pub fn replace(&mut self, definition: CheckerDefinition) -> Option<Arc<CheckerDefinition>> {
        self.definitions
            .insert(definition.name().to_string(), Arc::new(definition))
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&Arc<CheckerDefinition>> {
        self.definitions.get(name)
    }

    /// Every definition that can lint the given syntax.
    ///
    /// An empty syntax resolves to nothing.
    pub fn resolve(&self, syntax: &str) -> Vec<Arc<CheckerDefinition>> {
        if syntax.is_empty() {
            return Vec::new();
        }
        self.definitions
            .values()
            .filter(|def| def.can_lint(syntax))
            .cloned()
            .collect()
    }

    /// Iterates over all registered definitions.
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<CheckerDefinition>> {
        self.definitions.values()
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
