//! Embedded sub-language sections.
//!
//! A document mixing languages (say, a template with HTML and script) is
//! partitioned into disjoint byte ranges keyed by a selector. Each range is
//! linted by the checker instances declaring that selector, with line
//! numbers remapped back into whole-document coordinates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One embedded sub-language region of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Line number of `start` within the whole document; added to every
    /// diagnostic line produced while parsing this section.
    pub line_offset: usize,
    /// Byte offset where the section starts.
    pub start: usize,
    /// Byte offset one past the section end.
    pub end: usize,
}

impl Section {
    /// Creates a section.
    pub fn new(line_offset: usize, start: usize, end: usize) -> Self {
        Self {
            line_offset,
            start,
            end,
        }
    }

    /// Slices this section's text out of the document.
    ///
    /// Returns `None` when the range is out of bounds or not on char
    /// boundaries; a stale section map must not panic the pass.
    pub fn slice<'a>(&self, code: &'a str) -> Option<&'a str> {
        code.get(self.start..self.end)
    }
}

/// Sections for one lint pass, keyed by selector.
///
/// Sections sharing a selector must not overlap; they feed the same
/// instance's coordinate space.
pub type SectionMap = HashMap<String, Vec<Section>>;
