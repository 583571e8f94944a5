//! # lintmux_core
//!
//! Dispatch engine for multi-tool lint orchestration in an editor.
//!
//! This crate provides:
//! - Declarative checker definitions and the process-wide checker registry
//! - The per-document lifecycle of checker instances
//! - Section splitting for documents with embedded sub-languages
//! - The `Dispatcher` that ties resolution, invocation and delivery together
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintmux_core::{CheckerDefinition, CheckerRegistry, Dispatcher};
//!
//! let mut registry = CheckerRegistry::new();
//! registry.register(
//!     CheckerDefinition::builder("pyflakes")
//!         .syntax("python")
//!         .command(["pyflakes"])
//!         .pattern(r"[^:]+:(?P<line>\d+): (?P<error>.+)")
//!         .build(),
//! )?;
//!
//! let dispatcher = Dispatcher::new(registry, settings, invoker, host);
//! dispatcher.attach(&view);
//! dispatcher.lint_document(view.id(), None, &view.text(), &sections, deliver);
//! ```

mod definition;
mod dispatcher;
pub mod document;
mod documents;
mod error;
mod highlight;
pub mod host;
mod instance;
mod registry;
mod sections;
mod settings;
mod syntax;

pub use definition::{CheckerDefinition, CheckerDefinitionBuilder};
pub use dispatcher::{DeliverFn, Dispatcher, LintReport};
pub use document::{DocumentId, DocumentSource};
pub use documents::DocumentRegistry;
pub use error::LintError;
pub use highlight::{Highlight, Region};
pub use host::{HostJob, HostScheduler, InlineHost, run_exclusive};
pub use instance::{CheckerInstance, InstanceId};
pub use registry::CheckerRegistry;
pub use sections::{Section, SectionMap};
pub use settings::{SettingsProvider, StaticSettings, is_truthy};
pub use syntax::canonical_syntax;

#[cfg(test)]
pub mod test_utils;

pub use lintmux_checker::{
    CheckerError, CommandInvoker, Diagnostic, Invoker, OutputPattern, ParsedMatch,
};
