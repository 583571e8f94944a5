//! The per-document instance store.
//!
//! Maps each open document to the checker instances currently bound to it.
//! The registry map is only locked for entry lookup and replacement; each
//! document's instance set carries its own lock, held for the duration of a
//! lint pass. Operations on distinct documents never block each other, and
//! a pass on one document never holds the map lock while checker I/O runs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::document::DocumentId;
use crate::instance::{CheckerInstance, InstanceId};
use crate::registry::CheckerRegistry;
use crate::settings::SettingsProvider;
use crate::syntax::canonical_syntax;

/// One document's bound instances behind their own lock.
type InstanceCell = Arc<Mutex<Vec<CheckerInstance>>>;

/// Live checker instances, keyed by open document.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Mutex<HashMap<DocumentId, InstanceCell>>,
}

impl DocumentRegistry {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones a document's entry out of the map.
    ///
    /// The map lock is released before the caller locks the entry itself, so
    /// waiting on one document never blocks work on another.
    fn entry(&self, id: DocumentId) -> Option<InstanceCell> {
        self.documents.lock().get(&id).cloned()
    }

    /// Binds checker instances to a document based on its syntax.
    ///
    /// An empty or absent syntax detaches the document. When instances
    /// already exist and the first one's bound syntax equals the canonical
    /// token, the existing set is kept as-is; this short-circuit avoids
    /// rebuilding on redundant notifications. An entry locked by an
    /// in-flight pass is replaced rather than waited on. Returns the ids of
    /// the bound instances, or `None` when nothing handles the syntax.
    pub fn attach(
        &self,
        checkers: &CheckerRegistry,
        id: DocumentId,
        raw_syntax: Option<&str>,
        filename: Option<PathBuf>,
    ) -> Option<Vec<InstanceId>> {
        let raw = match raw_syntax {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                self.detach(id);
                return None;
            }
        };
        let token = canonical_syntax(raw);

        if let Some(entry) = self.entry(id)
            && let Some(existing) = entry.try_lock()
            && existing.first().is_some_and(|first| first.syntax() == token)
        {
            return Some(existing.iter().map(CheckerInstance::id).collect());
        }

        let instances: Vec<CheckerInstance> = checkers
            .resolve(token)
            .into_iter()
            .map(|definition| CheckerInstance::new(definition, id, token, filename.clone()))
            .collect();

        if instances.is_empty() {
            self.detach(id);
            return None;
        }

        debug!(
            "Attached {} to {}: {}",
            token,
            id,
            instances
                .iter()
                .map(CheckerInstance::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        let ids = instances.iter().map(CheckerInstance::id).collect();
        self.documents
            .lock()
            .insert(id, Arc::new(Mutex::new(instances)));
        Some(ids)
    }

    /// Removes every instance bound to a document.
    ///
    /// Idempotent; detaching an unknown document is a no-op. An in-flight
    /// pass on the removed entry finishes on its own clone and the state is
    /// dropped with it.
    pub fn detach(&self, id: DocumentId) {
        self.documents.lock().remove(&id);
    }

    /// Whether any instances are bound to the document.
    pub fn has_document(&self, id: DocumentId) -> bool {
        self.documents.lock().contains_key(&id)
    }

    /// The ids of the instances bound to a document, in creation order.
    pub fn instance_ids(&self, id: DocumentId) -> Vec<InstanceId> {
        self.entry(id)
            .map(|entry| entry.lock().iter().map(CheckerInstance::id).collect())
            .unwrap_or_default()
    }

    /// The checker names bound to a document.
    pub fn checker_names(&self, id: DocumentId) -> Vec<String> {
        self.entry(id)
            .map(|entry| entry.lock().iter().map(|i| i.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Runs `f` over a document's instances while holding only that
    /// document's entry; the registry map stays unlocked for the duration.
    pub fn with_instances<R>(
        &self,
        id: DocumentId,
        f: impl FnOnce(&mut Vec<CheckerInstance>) -> R,
    ) -> Option<R> {
        let entry = self.entry(id)?;
        let mut instances = entry.lock();
        Some(f(&mut instances))
    }

    /// Refreshes effective settings and rebuilds matching instances.
    ///
    /// Every definition's settings cache is recomputed first, so changes
    /// take effect everywhere. Then each live instance whose definition
    /// matches `filter` (all of them when `filter` is `None`) is cleared and
    /// replaced by a fresh instance with the same document binding. Returns
    /// the replaced pairs so the caller can request redraws.
    pub fn reload(
        &self,
        checkers: &CheckerRegistry,
        provider: &dyn SettingsProvider,
        filter: Option<&str>,
    ) -> Vec<(DocumentId, InstanceId)> {
        for definition in checkers.definitions() {
            definition.refresh_settings(provider);
        }

        let entries: Vec<(DocumentId, InstanceCell)> = self
            .documents
            .lock()
            .iter()
            .map(|(&id, entry)| (id, Arc::clone(entry)))
            .collect();

        let mut replaced = Vec::new();
        for (id, entry) in entries {
            let mut instances = entry.lock();
            for instance in instances.iter_mut() {
                if filter.is_some_and(|name| name != instance.name()) {
                    continue;
                }
                let Some(definition) = checkers.get(instance.name()) else {
                    warn!("Checker '{}' vanished during reload", instance.name());
                    continue;
                };

                instance.clear();
                let fresh = CheckerInstance::new(
                    Arc::clone(definition),
                    id,
                    instance.syntax().to_string(),
                    instance.filename().cloned(),
                );
                replaced.push((id, fresh.id()));
                *instance = fresh;
            }
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::settings::StaticSettings;
    use crate::test_utils::line_col_definition;

    use super::*;

    fn registry() -> CheckerRegistry {
        let mut checkers = CheckerRegistry::new();
        checkers
            .register(line_col_definition("pyflakes").build())
            .unwrap();
        checkers
            .register(line_col_definition("pep8").build())
            .unwrap();
        checkers
            .register(
                crate::CheckerDefinition::builder("rubocop")
                    .syntax("ruby")
                    .command(["rubocop"])
                    .pattern(r"(?P<line>\d+):(?P<col>\d+): (?P<error>.+)")
                    .build(),
            )
            .unwrap();
        checkers
    }

    const DOC: DocumentId = DocumentId(7);

    #[test]
    fn test_attach_binds_every_matching_definition() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let ids = documents
            .attach(&checkers, DOC, Some("python"), None)
            .unwrap();
        assert_eq!(ids.len(), 2);

        let mut names = documents.checker_names(DOC);
        names.sort();
        assert_eq!(names, vec!["pep8".to_string(), "pyflakes".to_string()]);
    }

    #[test]
    fn test_attach_is_idempotent_for_same_syntax() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let first = documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        let second = documents.attach(&checkers, DOC, Some("python"), None).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_attach_canonicalizes_syntax_paths() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let direct = documents.attach(&checkers, DOC, Some("python"), None);
        assert!(direct.is_some());
        documents.detach(DOC);

        let via_path = documents.attach(
            &checkers,
            DOC,
            Some("Packages/Python/python.tmLanguage"),
            None,
        );
        assert!(via_path.is_some());
    }

    #[test]
    fn test_syntax_change_rebuilds_instances() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let python_ids = documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        let ruby_ids = documents.attach(&checkers, DOC, Some("ruby"), None).unwrap();

        assert_eq!(ruby_ids.len(), 1);
        assert!(python_ids.iter().all(|id| !ruby_ids.contains(id)));
        assert_eq!(documents.checker_names(DOC), vec!["rubocop".to_string()]);
    }

    #[test]
    fn test_detach_then_attach_builds_fresh_instances() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let first = documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        documents.detach(DOC);
        let second = documents.attach(&checkers, DOC, Some("python"), None).unwrap();

        assert_eq!(first.len(), second.len());
        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[test]
    fn test_attach_empty_syntax_detaches() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        assert!(documents.attach(&checkers, DOC, Some(""), None).is_none());
        assert!(!documents.has_document(DOC));
    }

    #[test]
    fn test_attach_unhandled_syntax_detaches() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        assert!(documents.attach(&checkers, DOC, Some("fortran"), None).is_none());
        assert!(!documents.has_document(DOC));
    }

    #[test]
    fn test_detach_is_idempotent() {
        let documents = DocumentRegistry::new();
        documents.detach(DOC);
        documents.detach(DOC);
        assert!(!documents.has_document(DOC));
    }

    #[test]
    fn test_with_instances_leaves_other_documents_free() {
        let checkers = registry();
        let documents = DocumentRegistry::new();
        let other = DocumentId(8);

        documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        documents.attach(&checkers, other, Some("ruby"), None).unwrap();

        // A pass holds only its own entry, so registry operations on other
        // documents proceed while it runs.
        documents.with_instances(DOC, |_| {
            documents.detach(other);
            assert!(documents
                .attach(&checkers, other, Some("ruby"), None)
                .is_some());
        });

        assert!(documents.has_document(DOC));
        assert!(documents.has_document(other));
    }

    #[test]
    fn test_detach_during_pass_wins() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        documents.with_instances(DOC, |_| {
            documents.detach(DOC);
        });

        assert!(!documents.has_document(DOC));
    }

    #[test]
    fn test_reload_replaces_instances_and_keeps_binding() {
        let checkers = registry();
        let documents = DocumentRegistry::new();
        let provider = StaticSettings::new();

        let before = documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        let replaced = documents.reload(&checkers, &provider, None);

        assert_eq!(replaced.len(), 2);
        let after = documents.instance_ids(DOC);
        assert!(before.iter().all(|id| !after.contains(id)));
        assert_eq!(documents.checker_names(DOC).len(), 2);
    }

    #[test]
    fn test_reload_filter_only_touches_matching_checker() {
        let checkers = registry();
        let documents = DocumentRegistry::new();
        let provider = StaticSettings::new();

        let before = documents.attach(&checkers, DOC, Some("python"), None).unwrap();
        let replaced = documents.reload(&checkers, &provider, Some("pyflakes"));

        assert_eq!(replaced.len(), 1);
        let after = documents.instance_ids(DOC);
        // Exactly one id survived untouched.
        let surviving = before.iter().filter(|id| after.contains(id)).count();
        assert_eq!(surviving, 1);
    }

    #[test]
    fn test_reload_refreshes_settings_cache() {
        let checkers = registry();
        let documents = DocumentRegistry::new();

        let mut provider = StaticSettings::new();
        provider.set_plugin("pyflakes", "disable", json!(true));
        documents.reload(&checkers, &provider, None);

        // The cache answers even through an empty provider now.
        let empty = StaticSettings::new();
        let settings = checkers.get("pyflakes").unwrap().settings(&empty);
        assert_eq!(settings.get("disable"), Some(&json!(true)));
    }
}
