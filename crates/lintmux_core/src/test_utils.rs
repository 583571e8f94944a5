//! Shared fakes for engine tests.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use lintmux_checker::{CheckerError, Invoker};

use crate::definition::{CheckerDefinition, CheckerDefinitionBuilder};
use crate::document::{DocumentId, DocumentSource};

/// Canned-output invoker that records every call.
#[derive(Clone)]
pub struct FakeInvoker {
    inner: Arc<FakeInvokerInner>,
}

struct FakeInvokerInner {
    output: Option<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeInvoker {
    /// Always returns the given stdout.
    pub fn returning(output: &str) -> Self {
        Self {
            inner: Arc::new(FakeInvokerInner {
                output: Some(output.to_string()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Always fails to invoke.
    pub fn failing() -> Self {
        Self {
            inner: Arc::new(FakeInvokerInner {
                output: None,
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A shareable handle usable where the engine expects an invoker.
    pub fn handle(&self) -> Arc<dyn Invoker> {
        Arc::new(self.clone())
    }

    /// Every argv this invoker was called with.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.inner.calls.lock().clone()
    }
}

impl Invoker for FakeInvoker {
    fn invoke(&self, command: &[String], _input: &str) -> Result<String, CheckerError> {
        self.inner.calls.lock().push(command.to_vec());
        match &self.inner.output {
            Some(output) => Ok(output.clone()),
            None => Err(CheckerError::invocation("fake checker refused to run")),
        }
    }
}

/// A definition builder preloaded with the usual `line:col: message` shape.
pub fn line_col_definition(name: &str) -> CheckerDefinitionBuilder {
    CheckerDefinition::builder(name)
        .syntax("python")
        .command([name])
        .pattern(r"(?P<line>\d+):(?P<col>\d+): (?P<error>.+)")
}

/// In-memory document.
pub struct FakeDocument {
    pub id: DocumentId,
    pub syntax: Option<String>,
    pub text: String,
    pub file: Option<PathBuf>,
}

impl FakeDocument {
    pub fn new(id: u64, syntax: &str, text: &str) -> Self {
        Self {
            id: DocumentId(id),
            syntax: Some(syntax.to_string()),
            text: text.to_string(),
            file: Some(PathBuf::from("main.py")),
        }
    }
}

impl DocumentSource for FakeDocument {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn syntax(&self) -> Option<String> {
        self.syntax.clone()
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn file_name(&self) -> Option<PathBuf> {
        self.file.clone()
    }
}
