//! Syntax token canonicalization.

use std::sync::OnceLock;

use regex::Regex;

fn syntax_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/([^/]+)\.tmLanguage$").expect("static pattern compiles"))
}

/// Reduces a raw syntax value to its canonical token.
///
/// Editors often report syntax as a definition file path such as
/// `Packages/Python/Python.tmLanguage`; that reduces to `Python`. Anything
/// else passes through unchanged.
pub fn canonical_syntax(raw: &str) -> &str {
    match syntax_path_re().captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::canonical_syntax;

    #[test]
    fn test_tm_language_path_reduces_to_base_name() {
        assert_eq!(
            canonical_syntax("Packages/Python/Python.tmLanguage"),
            "Python"
        );
    }

    #[test]
    fn test_plain_token_passes_through() {
        assert_eq!(canonical_syntax("python"), "python");
    }

    #[test]
    fn test_non_tm_language_path_passes_through() {
        assert_eq!(canonical_syntax("Packages/Rust/Rust.sublime-syntax"),
            "Packages/Rust/Rust.sublime-syntax");
    }
}
