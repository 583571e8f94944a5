//! Output-pattern parsing of raw checker stdout.
//!
//! A checker declares a regex with the named capture groups `line`, `col`,
//! `error` and `near`. In multiline mode the pattern is run once against the
//! whole output; otherwise it is matched once per stripped line, anchored at
//! the line start. Either way the caller gets a lazy sequence of
//! [`ParsedMatch`] values and filters on [`ParsedMatch::matched`].

use regex::{CaptureMatches, Captures, Regex, RegexBuilder};

use crate::CheckerError;

/// A compiled checker output pattern.
#[derive(Debug, Clone)]
pub struct OutputPattern {
    regex: Regex,
    multiline: bool,
}

/// One converted match from checker output.
///
/// `row`/`col` are zero-based; the one-based values captured from the output
/// are converted here. A non-match is represented as an empty result with
/// `matched == false` so that "ran, found nothing" stays distinguishable
/// from "never ran".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMatch {
    /// Whether the pattern actually matched.
    pub matched: bool,
    /// Zero-based line, if the `line` group captured.
    pub row: Option<usize>,
    /// Zero-based column, if the `col` group captured.
    pub col: Option<usize>,
    /// The captured `error` message, empty if absent.
    pub message: String,
    /// The captured `near` token, if any.
    pub near: Option<String>,
}

impl ParsedMatch {
    /// An empty result: the pattern did not match.
    pub fn empty() -> Self {
        Self {
            matched: false,
            row: None,
            col: None,
            message: String::new(),
            near: None,
        }
    }

    fn from_captures(caps: &Captures<'_>) -> Self {
        let row = caps
            .name("line")
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .map(|n| n.saturating_sub(1));
        let col = caps
            .name("col")
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .map(|n| n.saturating_sub(1));
        let message = caps
            .name("error")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let near = caps.name("near").map(|m| m.as_str().to_string());

        Self {
            matched: true,
            row,
            col,
            message,
            near,
        }
    }
}

impl OutputPattern {
    /// Compiles an output pattern.
    ///
    /// In multiline mode `^`/`$` match at line boundaries, mirroring how the
    /// pattern is run against the entire output at once.
    pub fn compile(source: &str, multiline: bool) -> Result<Self, CheckerError> {
        let regex = RegexBuilder::new(source).multi_line(multiline).build()?;
        Ok(Self { regex, multiline })
    }

    /// Whether this pattern runs in whole-output mode.
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Lazily parses raw checker output into match results.
    ///
    /// Multiline mode yields every match over the whole output, or a single
    /// empty placeholder when nothing matched. Per-line mode yields exactly
    /// one result per line, empty results included.
    pub fn matches<'a>(&'a self, output: &'a str) -> Matches<'a> {
        if self.multiline {
            Matches::Multiline {
                iter: self.regex.captures_iter(output),
                yielded_any: false,
                placeholder_emitted: false,
            }
        } else {
            Matches::PerLine {
                regex: &self.regex,
                lines: output.lines(),
            }
        }
    }
}

/// Lazy iterator over parsed checker output.
pub enum Matches<'a> {
    /// Whole-output mode.
    Multiline {
        iter: CaptureMatches<'a, 'a>,
        yielded_any: bool,
        placeholder_emitted: bool,
    },
    /// One anchored match attempt per stripped line.
    PerLine {
        regex: &'a Regex,
        lines: std::str::Lines<'a>,
    },
}

impl Iterator for Matches<'_> {
    type Item = ParsedMatch;

    fn next(&mut self) -> Option<ParsedMatch> {
        match self {
            Matches::Multiline {
                iter,
                yielded_any,
                placeholder_emitted,
            } => {
                if let Some(caps) = iter.next() {
                    *yielded_any = true;
                    Some(ParsedMatch::from_captures(&caps))
                } else if !*yielded_any && !*placeholder_emitted {
                    *placeholder_emitted = true;
                    Some(ParsedMatch::empty())
                } else {
                    None
                }
            }
            Matches::PerLine { regex, lines } => {
                let line = lines.next()?.trim();
                Some(match_line(regex, line))
            }
        }
    }
}

/// Matches a single stripped line, anchored at the line start.
fn match_line(regex: &Regex, line: &str) -> ParsedMatch {
    match regex.captures(line) {
        // The leftmost match must start at 0, like an anchored match; a hit
        // further into the line is checker noise, not a diagnostic.
        Some(caps) if caps.get(0).is_some_and(|m| m.start() == 0) => {
            ParsedMatch::from_captures(&caps)
        }
        _ => ParsedMatch::empty(),
    }
}
