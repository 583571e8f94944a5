//! Highlight region recording.
//!
//! Drawing belongs to the presentation layer; the engine only records which
//! regions a checker asked to mark, already remapped into whole-document
//! coordinates. The recorder carries the definition's visual scope and
//! outline flag so the presentation layer has everything it needs.

use serde::{Deserialize, Serialize};

/// One requested highlight region, in whole-document coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Mark from a known column on a line.
    Range { line: usize, column: usize },
    /// Search for `token` on `line` and mark the hit.
    Near { line: usize, token: String },
    /// Mark the whole line.
    Line { line: usize },
}

/// Records highlight requests for one checker instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Visual category the presentation layer maps to a color.
    pub scope: String,
    /// Whether marks are drawn as outlines.
    pub outline: bool,
    line_shift: usize,
    byte_shift: usize,
    regions: Vec<Region>,
}

impl Highlight {
    /// Creates an empty recorder.
    pub fn new(scope: impl Into<String>, outline: bool) -> Self {
        Self {
            scope: scope.into(),
            outline,
            line_shift: 0,
            byte_shift: 0,
            regions: Vec::new(),
        }
    }

    /// Shifts subsequent requests into the coordinate space of a section
    /// starting at `line_offset` / `byte_offset`.
    pub fn shift(&mut self, line_offset: usize, byte_offset: usize) {
        self.line_shift = line_offset;
        self.byte_shift = byte_offset;
    }

    /// Requests a range mark at `(row, col)` in pass-local coordinates.
    pub fn range(&mut self, row: usize, col: usize) {
        self.regions.push(Region::Range {
            line: row + self.line_shift,
            column: col,
        });
    }

    /// Requests a near-token mark on `row`.
    pub fn near(&mut self, row: usize, token: impl Into<String>) {
        self.regions.push(Region::Near {
            line: row + self.line_shift,
            token: token.into(),
        });
    }

    /// Requests a whole-line mark on `row`.
    pub fn line(&mut self, row: usize) {
        self.regions.push(Region::Line {
            line: row + self.line_shift,
        });
    }

    /// The current `(line, byte)` shift.
    pub fn offsets(&self) -> (usize, usize) {
        (self.line_shift, self.byte_shift)
    }

    /// Appends an already-remapped region, ignoring the current shift.
    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// The recorded regions, in request order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Drops every recorded region and resets the shift.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.line_shift = 0;
        self.byte_shift = 0;
    }

    /// Takes the recorded regions, leaving the recorder empty.
    pub fn take_regions(&mut self) -> Vec<Region> {
        std::mem::take(&mut self.regions)
    }
}
