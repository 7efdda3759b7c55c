//! Shared constants and validation patterns.

use regex::Regex;
use std::sync::LazyLock;

pub const NAME: &str = "FormProjection";
pub const VERSION: &str = "0.1.0";

/// Prefix for generated element ids when the caller supplies no path.
/// Must itself satisfy [`RX_IDENTIFIER`].
pub const ID_PREFIX: &str = "form";

/// Field and fieldset keys: lower-case, no dots, no leading digit.
pub static RX_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-z][_0-9a-z]*$").unwrap());

/// Fieldset titles: 1 to 32 characters, case-insensitive.
pub static RX_META_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[-_ 0-9a-z]{1,32}$").unwrap());

/// Dot-joined paths, 255 characters at most.
pub static RX_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-z][._0-9a-z]{0,254}$").unwrap());

/// Nesting bounds for the compiler. Depth 1 is the root fieldset; anything
/// past [`MAX_DEPTH`] is a hard error, never a silent truncation.
pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_pattern() {
        assert!(RX_IDENTIFIER.is_match("outer_boolean"));
        assert!(RX_IDENTIFIER.is_match("_"));
        assert!(!RX_IDENTIFIER.is_match("1abc"));
        assert!(!RX_IDENTIFIER.is_match("a.b"));
        assert!(!RX_IDENTIFIER.is_match("café"));
        assert!(!RX_IDENTIFIER.is_match("Abc"));
    }

    #[test]
    fn title_pattern_is_case_insensitive_and_bounded() {
        assert!(RX_META_TITLE.is_match("My Form"));
        assert!(RX_META_TITLE.is_match("ABC-123_x"));
        assert!(!RX_META_TITLE.is_match(""));
        assert!(!RX_META_TITLE.is_match(&"x".repeat(33)));
        assert!(!RX_META_TITLE.is_match("no!"));
    }

    #[test]
    fn path_pattern_caps_at_255_characters() {
        assert!(RX_PATH.is_match("form.outer.inner"));
        let long = format!("a{}", ".b".repeat(127)); // 255 chars
        assert!(RX_PATH.is_match(&long));
        let too_long = format!("a{}x", ".b".repeat(127)); // 256 chars
        assert!(!RX_PATH.is_match(&too_long));
        assert!(!RX_PATH.is_match("xy-z"));
        assert!(!RX_PATH.is_match("9abc"));
    }

    #[test]
    fn id_prefix_is_a_legal_identifier() {
        assert!(RX_IDENTIFIER.is_match(ID_PREFIX));
    }

    #[test]
    fn version_matches_the_package() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
