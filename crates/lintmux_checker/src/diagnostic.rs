//! Diagnostic types for checker results.

use serde::{Deserialize, Serialize};

/// One reported issue from a checker.
///
/// Lines and columns are zero-based. Checker output is typically one-based
/// and converted during parsing; a missing column stays absent rather than
/// defaulting to zero, since column 0 is itself a valid position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Zero-based line the issue was reported on.
    pub line: usize,

    /// Zero-based column, when the checker reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    /// Messages accumulated for this line, in match order.
    pub messages: Vec<String>,

    /// Substring hint used to locate the issue when no column was reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with a single message.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            messages: vec![message.into()],
            near: None,
        }
    }

    /// Sets the column.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Sets the near token.
    pub fn with_near(mut self, near: impl Into<String>) -> Self {
        self.near = Some(near.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(3, "unused variable");

        assert_eq!(diag.line, 3);
        assert_eq!(diag.column, None);
        assert_eq!(diag.messages, vec!["unused variable".to_string()]);
        assert_eq!(diag.near, None);
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::new(0, "bad indent")
            .with_column(0)
            .with_near("foo");

        // Line and column zero are valid positions, distinct from absent.
        assert_eq!(diag.line, 0);
        assert_eq!(diag.column, Some(0));
        assert_eq!(diag.near.as_deref(), Some("foo"));
    }

    #[test]
    fn test_diagnostic_serialization_skips_absent_fields() {
        let diag = Diagnostic::new(1, "msg");
        let json = serde_json::to_string(&diag).unwrap();

        assert!(!json.contains("column"));
        assert!(!json.contains("near"));
    }

    #[test]
    fn test_diagnostic_roundtrip() {
        let diag = Diagnostic::new(7, "msg").with_column(2);
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();

        assert_eq!(diag, back);
    }
}
