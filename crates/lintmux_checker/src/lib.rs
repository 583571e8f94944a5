//! # lintmux_checker
//!
//! Checker-side building blocks for lintmux.
//!
//! This crate provides:
//! - The `Diagnostic` value type
//! - Output-pattern parsing of raw checker stdout
//! - Tab-width-aware column correction
//! - The external-process invocation seam
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintmux_checker::OutputPattern;
//!
//! let pattern = OutputPattern::compile(r"(?P<line>\d+):(?P<col>\d+): (?P<error>.+)", false)?;
//! for m in pattern.matches("3:1: unused variable") {
//!     if m.matched {
//!         println!("{:?}: {}", m.row, m.message);
//!     }
//! }
//! ```

mod columns;
mod diagnostic;
mod error;
mod invoke;
mod output;

pub use columns::correct_column;
pub use diagnostic::Diagnostic;
pub use error::CheckerError;
pub use invoke::{CommandInvoker, Invoker};
pub use output::{Matches, OutputPattern, ParsedMatch};
