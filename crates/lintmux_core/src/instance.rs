//! Live, document-bound checker instances.
//!
//! An instance is created when a definition matches a document's syntax and
//! lives until the document closes or a reload rebuilds it. It accumulates
//! the diagnostics of one checker for one document; instances are never
//! shared across documents.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use tracing::debug;

use lintmux_checker::{Invoker, correct_column};

use crate::definition::CheckerDefinition;
use crate::document::DocumentId;
use crate::error::LintError;
use crate::highlight::Highlight;
use crate::host::{HostScheduler, run_exclusive};
use crate::settings::SettingsProvider;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one checker instance for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

/// One checker bound to one document.
#[derive(Debug)]
pub struct CheckerInstance {
    id: InstanceId,
    definition: Arc<CheckerDefinition>,
    document: DocumentId,
    syntax: String,
    filename: Option<PathBuf>,
    errors: HashMap<usize, Vec<String>>,
    unlocated: Vec<String>,
    highlight: Highlight,
}

/// Result of running a checker over one text range, already remapped into
/// whole-document coordinates.
#[derive(Debug)]
struct CheckOutput {
    errors: HashMap<usize, Vec<String>>,
    unlocated: Vec<String>,
    highlight: Highlight,
}

impl CheckerInstance {
    /// Binds a definition to a document.
    pub fn new(
        definition: Arc<CheckerDefinition>,
        document: DocumentId,
        syntax: impl Into<String>,
        filename: Option<PathBuf>,
    ) -> Self {
        let highlight = Highlight::new(definition.scope(), definition.outline());
        Self {
            id: InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
            definition,
            document,
            syntax: syntax.into(),
            filename,
            errors: HashMap::new(),
            unlocated: Vec::new(),
            highlight,
        }
    }

    /// This instance's unique identity.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The originating definition's name.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The originating definition.
    pub fn definition(&self) -> &Arc<CheckerDefinition> {
        &self.definition
    }

    /// The document this instance is bound to.
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// The syntax token this instance was bound with.
    pub fn syntax(&self) -> &str {
        &self.syntax
    }

    /// The file path the document had at the last lint.
    pub fn filename(&self) -> Option<&PathBuf> {
        self.filename.as_ref()
    }

    /// Updates the file path before a pass.
    pub fn set_filename(&mut self, filename: Option<PathBuf>) {
        self.filename = filename;
    }

    /// The selector restricting this instance to embedded sections, if any.
    pub fn selector(&self) -> Option<&str> {
        self.definition.selector()
    }

    /// Accumulated messages, keyed by zero-based document line.
    pub fn errors(&self) -> &HashMap<usize, Vec<String>> {
        &self.errors
    }

    /// Messages whose match carried no row.
    pub fn unlocated(&self) -> &[String] {
        &self.unlocated
    }

    /// The recorded highlight requests.
    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// Effective settings for this instance's checker.
    pub fn settings(&self, provider: &dyn SettingsProvider) -> Map<String, Value> {
        self.definition.settings(provider)
    }

    /// Drops accumulated diagnostics and highlight state.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.unlocated.clear();
        self.highlight.clear();
    }

    /// Lints one text range and merges the results into this instance.
    ///
    /// `line_offset`/`byte_offset` locate the range within the whole
    /// document; whole-document passes use zero for both. Definitions marked
    /// exclusive run the checker on the host context through the rendezvous;
    /// everything else runs on the calling worker.
    pub fn lint_range(
        &mut self,
        code: &str,
        line_offset: usize,
        byte_offset: usize,
        invoker: &Arc<dyn Invoker>,
        host: &dyn HostScheduler,
    ) -> Result<(), LintError> {
        if code.is_empty() {
            return Ok(());
        }
        if !self.definition.is_complete() {
            return Err(LintError::IncompleteDefinition(self.name().to_string()));
        }
        if self.definition.pattern().is_none() {
            // Pattern source declared but failed to compile at registration.
            debug!("Checker '{}' is disabled (pattern did not compile)", self.name());
            return Ok(());
        }

        let output = if self.definition.needs_exclusive_host() {
            let definition = Arc::clone(&self.definition);
            let invoker = Arc::clone(invoker);
            let code = code.to_string();
            run_exclusive(host, move || {
                run_checker(&definition, &code, invoker.as_ref(), line_offset, byte_offset)
            })
            .ok_or_else(|| LintError::HostGone(self.name().to_string()))?
        } else {
            run_checker(&self.definition, code, invoker.as_ref(), line_offset, byte_offset)
        };

        for (line, messages) in output.errors {
            self.errors.entry(line).or_default().extend(messages);
        }
        self.unlocated.extend(output.unlocated);
        let mut produced = output.highlight;
        for region in produced.take_regions() {
            self.highlight.push(region);
        }
        Ok(())
    }
}

/// Invokes the checker and parses its output.
///
/// Invocation failure and unmatched output degrade to "nothing found";
/// they never abort a pass.
fn run_checker(
    definition: &CheckerDefinition,
    code: &str,
    invoker: &dyn Invoker,
    line_offset: usize,
    byte_offset: usize,
) -> CheckOutput {
    let mut out = CheckOutput {
        errors: HashMap::new(),
        unlocated: Vec::new(),
        highlight: Highlight::new(definition.scope(), definition.outline()),
    };
    out.highlight.shift(line_offset, byte_offset);

    let output = match invoker.invoke(definition.command(), code) {
        Ok(output) if !output.is_empty() => output,
        Ok(_) => return out,
        Err(e) => {
            debug!("Checker '{}' produced no output: {}", definition.name(), e);
            return out;
        }
    };
    debug!("Output from '{}': {:?}", definition.name(), output);

    let pattern = match definition.pattern() {
        Some(pattern) => pattern,
        None => return out,
    };
    let tab_size = definition.tab_size();

    for m in pattern.matches(&output) {
        if !m.matched {
            continue;
        }

        let row = match m.row {
            Some(row) => row,
            None => {
                // The original dropped these on the floor; keep the message.
                if !m.message.is_empty() {
                    out.unlocated.push(m.message);
                }
                continue;
            }
        };

        if let Some(col) = m.col {
            let col = if tab_size > 1 {
                let line = code.lines().nth(row).unwrap_or("");
                correct_column(line, col, tab_size)
            } else {
                col
            };
            out.highlight.range(row, col);
        } else if let Some(near) = &m.near {
            out.highlight.near(row, near.clone());
        } else {
            out.highlight.line(row);
        }

        out.errors.entry(row + line_offset).or_default().push(m.message);
    }

    out
}
