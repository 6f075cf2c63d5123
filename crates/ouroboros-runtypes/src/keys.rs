//! Numeric key recognition
//!
//! Object keys are always strings at runtime. A number-keyed dictionary
//! accepts a key when converting it to a number does not yield `NaN`,
//! following the host's string-to-number rules: surrounding whitespace is
//! ignored, the empty string is `0`, and hex/octal/binary literals and
//! `Infinity` are numbers.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Signed decimal literal with optional fraction and exponent
static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
});

/// Unsigned radix literal (0x.., 0o.., 0b..)
static RADIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0([xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)$").unwrap()
});

/// Whitespace and line terminators stripped before conversion
///
/// Unlike `char::is_whitespace`, this excludes U+0085 and includes U+FEFF.
fn is_host_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Whether `key` converts to a number other than `NaN`
///
/// # Example
/// ```
/// use ouroboros_runtypes::keys::is_numeric_key;
///
/// assert!(is_numeric_key("42"));
/// assert!(is_numeric_key(" 1e3 "));
/// assert!(!is_numeric_key("a"));
/// ```
pub fn is_numeric_key(key: &str) -> bool {
    let trimmed = key.trim_matches(is_host_whitespace);
    if trimmed.is_empty() {
        return true;
    }
    matches!(trimmed, "Infinity" | "+Infinity" | "-Infinity")
        || DECIMAL_REGEX.is_match(trimmed)
        || RADIX_REGEX.is_match(trimmed)
}
