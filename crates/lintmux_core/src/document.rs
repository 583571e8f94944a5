//! The document seam.
//!
//! The engine never touches the editor's buffer type directly; it reads
//! everything it needs through [`DocumentSource`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifies an open document for as long as it stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Read-only view of an open document.
pub trait DocumentSource {
    /// The stable identifier of this document.
    fn id(&self) -> DocumentId;

    /// The raw syntax token or syntax-definition path, if any.
    fn syntax(&self) -> Option<String>;

    /// The full document text.
    fn text(&self) -> String;

    /// The backing file path, if the document is saved.
    fn file_name(&self) -> Option<PathBuf>;
}
