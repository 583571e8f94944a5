//! Tab-width-aware column correction.

/// Adjusts a reported zero-based column for tab expansion.
///
/// Checkers tend to measure columns in expanded-tab space while the editor
/// addresses raw characters. Scanning the source line left to right, every
/// tab seen so far contributes `tab_size - 1` phantom columns; the corrected
/// column is the first scan index `i` with `col - diff <= i`.
///
/// With `tab_size <= 1`, or when the scan never satisfies the inequality,
/// the reported column is returned unchanged.
pub fn correct_column(line: &str, col: usize, tab_size: usize) -> usize {
    if tab_size <= 1 {
        return col;
    }

    let mut diff = 0usize;
    for (i, ch) in line.chars().enumerate() {
        if ch == '\t' {
            diff += tab_size - 1;
        }
        if col as i64 - diff as i64 <= i as i64 {
            return i;
        }
    }

    col
}
