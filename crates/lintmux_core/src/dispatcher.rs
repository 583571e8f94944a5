//! Top-level lint orchestration.
//!
//! The dispatcher wires the injected stores together: it resolves which
//! definitions apply to a document, maintains the instance lifecycle, runs
//! a lint pass (splitting embedded sections where declared), and schedules
//! result delivery on the host context.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lintmux_checker::{Diagnostic, Invoker};

use crate::document::{DocumentId, DocumentSource};
use crate::documents::DocumentRegistry;
use crate::error::LintError;
use crate::highlight::Region;
use crate::host::HostScheduler;
use crate::instance::{CheckerInstance, InstanceId};
use crate::registry::CheckerRegistry;
use crate::sections::SectionMap;
use crate::settings::{SettingsProvider, is_truthy};

/// Final per-checker result of one lint pass, ready for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    /// Name of the checker that produced this report.
    pub checker: String,
    /// Visual scope for the regions.
    pub scope: String,
    /// Whether regions are drawn as outlines.
    pub outline: bool,
    /// Messages keyed by zero-based document line.
    pub errors: BTreeMap<usize, Vec<String>>,
    /// Messages whose match carried no line.
    pub unlocated: Vec<String>,
    /// Requested highlight regions, in whole-document coordinates.
    pub regions: Vec<Region>,
}

impl LintReport {
    /// Flattens the report into per-line diagnostic records, attaching the
    /// column or near token from the first region recorded for each line.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|(&line, messages)| {
                let mut diagnostic = Diagnostic {
                    line,
                    column: None,
                    messages: messages.clone(),
                    near: None,
                };
                for region in &self.regions {
                    match region {
                        Region::Range { line: l, column } if *l == line => {
                            diagnostic.column = Some(*column);
                            break;
                        }
                        Region::Near { line: l, token } if *l == line => {
                            diagnostic.near = Some(token.clone());
                            break;
                        }
                        _ => {}
                    }
                }
                diagnostic
            })
            .collect()
    }
}

/// Callback receiving the merged result of a lint pass.
pub type DeliverFn = Box<dyn FnOnce(DocumentId, Vec<LintReport>) + Send>;

/// Orchestrates checker resolution, invocation and result delivery.
pub struct Dispatcher {
    checkers: CheckerRegistry,
    documents: DocumentRegistry,
    settings: Arc<dyn SettingsProvider>,
    invoker: Arc<dyn Invoker>,
    host: Arc<dyn HostScheduler>,
}

impl Dispatcher {
    /// Creates a dispatcher over an already-populated checker registry.
    pub fn new(
        checkers: CheckerRegistry,
        settings: Arc<dyn SettingsProvider>,
        invoker: Arc<dyn Invoker>,
        host: Arc<dyn HostScheduler>,
    ) -> Self {
        Self {
            checkers,
            documents: DocumentRegistry::new(),
            settings,
            invoker,
            host,
        }
    }

    /// The checker registry.
    pub fn checkers(&self) -> &CheckerRegistry {
        &self.checkers
    }

    /// The per-document instance store.
    pub fn documents(&self) -> &DocumentRegistry {
        &self.documents
    }

    /// Binds checker instances to a document based on its current syntax.
    pub fn attach(&self, view: &dyn DocumentSource) -> Option<Vec<InstanceId>> {
        self.documents.attach(
            &self.checkers,
            view.id(),
            view.syntax().as_deref(),
            view.file_name(),
        )
    }

    /// Releases a closed document.
    pub fn detach(&self, id: DocumentId) {
        self.documents.detach(id);
    }

    /// Re-applies settings and rebuilds live instances.
    ///
    /// `filter` limits the rebuild to instances of one checker.
    pub fn reload(&self, filter: Option<&str>) -> Vec<(DocumentId, InstanceId)> {
        let replaced = self
            .documents
            .reload(&self.checkers, self.settings.as_ref(), filter);
        for (id, instance) in &replaced {
            debug!("Redraw requested for {} after reload of {:?}", id, instance);
        }
        replaced
    }

    /// Names of the checkers currently bound to a document.
    pub fn linters_for(&self, id: DocumentId) -> Vec<String> {
        self.documents.checker_names(id)
    }

    /// Runs one lint pass over a document and delivers the merged result.
    ///
    /// Selector-less instances lint the whole text; selector-bound instances
    /// lint each matching section with line remapping. Checkers disabled via
    /// settings are skipped. The reports are handed to `deliver` on the host
    /// context. A document with no bound instances delivers nothing.
    pub fn lint_document(
        &self,
        id: DocumentId,
        filename: Option<PathBuf>,
        code: &str,
        sections: &SectionMap,
        deliver: DeliverFn,
    ) -> Result<(), LintError> {
        let names = self.documents.checker_names(id);
        if names.is_empty() {
            return Ok(());
        }
        debug!(
            "Linting `{}` as {}",
            filename
                .as_deref()
                .map_or_else(|| "untitled".to_string(), |p| p.display().to_string()),
            names.join(", ")
        );

        let reports = self
            .documents
            .with_instances(id, |instances| {
                self.run_pass(instances, filename, code, sections)
            })
            .transpose()?
            .unwrap_or_default();

        if !reports.is_empty() {
            self.host.schedule(Box::new(move || deliver(id, reports)));
        }
        Ok(())
    }

    fn run_pass(
        &self,
        instances: &mut [CheckerInstance],
        filename: Option<PathBuf>,
        code: &str,
        sections: &SectionMap,
    ) -> Result<Vec<LintReport>, LintError> {
        for instance in instances.iter_mut() {
            let settings = instance.settings(self.settings.as_ref());
            if is_truthy(settings.get("disable")) {
                debug!("Checker '{}' is disabled by settings", instance.name());
                continue;
            }

            instance.clear();
            match instance.selector() {
                None => {
                    instance.set_filename(filename.clone());
                    instance.lint_range(code, 0, 0, &self.invoker, self.host.as_ref())?;
                }
                Some(selector) => {
                    let selector = selector.to_string();
                    for section in sections.get(&selector).into_iter().flatten() {
                        let Some(sub) = section.slice(code) else {
                            warn!(
                                "Section {}..{} out of bounds for '{}'",
                                section.start,
                                section.end,
                                instance.name()
                            );
                            continue;
                        };
                        instance.lint_range(
                            sub,
                            section.line_offset,
                            section.start,
                            &self.invoker,
                            self.host.as_ref(),
                        )?;
                    }
                }
            }
        }

        Ok(instances.iter().map(report_for).collect())
    }
}

fn report_for(instance: &CheckerInstance) -> LintReport {
    LintReport {
        checker: instance.name().to_string(),
        scope: instance.highlight().scope.clone(),
        outline: instance.highlight().outline,
        errors: instance
            .errors()
            .iter()
            .map(|(line, messages)| (*line, messages.clone()))
            .collect(),
        unlocated: instance.unlocated().to_vec(),
        regions: instance.highlight().regions().to_vec(),
    }
}
