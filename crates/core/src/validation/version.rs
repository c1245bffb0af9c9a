//! Version string format shared by both target kinds.

use std::sync::LazyLock;

use regex::Regex;

/// Dot-separated non-negative integers with an optional `-suffix`.
///
/// ASCII digit classes are spelled out: `\d` in the `regex` crate also
/// matches non-ASCII digits.
pub const VERSION_PATTERN: &str = r"^[0-9]+(\.[0-9]+)*(-[A-Za-z0-9]+)?$";

pub const INVALID_VERSION_MESSAGE: &str = "Invalid version format. Expected format: x.y.z[-suffix]";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PATTERN).expect("valid regex"));

/// Check a version string against [`VERSION_PATTERN`].
///
/// Surrounding whitespace is ignored; an empty string is never valid.
///
/// # Examples
///
/// ```
/// use deptrack_core::validation::is_valid_version;
/// assert!(is_valid_version("2.0.0-beta1"));
/// assert!(!is_valid_version("v2"));
/// ```
pub fn is_valid_version(version: &str) -> bool {
    VERSION_RE.is_match(version.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_suffixed_versions() {
        for v in ["1", "11", "1.2", "1.2.3", "11.0.1", "2.0.0-beta1", "10.4.0-RC2", "1.2.3.4"] {
            assert!(is_valid_version(v), "{v} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_versions() {
        for v in ["", "abc", "v1.2", "1.", ".1", "1..2", "1.2-", "1.2-beta.1", "1.2.x", "1-2-3"] {
            assert!(!is_valid_version(v), "{v} should be invalid");
        }
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert!(!is_valid_version("١.٢"));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert!(is_valid_version(" 3.9 "));
    }
}
