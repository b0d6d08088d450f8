//! core::flags
//!
//! Environment flags that select the pipeline branch.
//!
//! # Flags
//!
//! - `CHECK_DOCS` - selects the documentation build path instead of the test path
//! - `CHECK_FORMATTING` - enables the formatting check within the test path
//!
//! # Truthiness
//!
//! A flag is enabled iff its value is exactly `"1"`. Any other value,
//! including `"true"`, `"yes"`, or the empty string, is treated the same as
//! unset. This matches the literal string comparison CI configs rely on;
//! the rule lives in [`is_enabled`] and nowhere else.

/// Environment variable selecting the documentation build path.
pub const CHECK_DOCS: &str = "CHECK_DOCS";

/// Environment variable enabling the formatting check in the test path.
pub const CHECK_FORMATTING: &str = "CHECK_FORMATTING";

/// Literal truthiness rule for pipeline flags.
pub fn is_enabled(value: Option<&str>) -> bool {
    value == Some("1")
}

/// The recognized environment flags, resolved to booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// Build documentation instead of running tests.
    pub check_docs: bool,
    /// Run the formatting check before the test suite.
    pub check_formatting: bool,
}

impl EnvFlags {
    /// Read flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read flags through an arbitrary lookup function.
    ///
    /// This keeps the resolution logic testable without mutating the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            check_docs: is_enabled(lookup(CHECK_DOCS).as_deref()),
            check_formatting: is_enabled(lookup(CHECK_FORMATTING).as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_is_the_only_truthy_value() {
        assert!(is_enabled(Some("1")));

        assert!(!is_enabled(None));
        assert!(!is_enabled(Some("")));
        assert!(!is_enabled(Some("0")));
        assert!(!is_enabled(Some("true")));
        assert!(!is_enabled(Some("yes")));
        assert!(!is_enabled(Some("1 ")));
        assert!(!is_enabled(Some("01")));
    }

    #[test]
    fn from_lookup_resolves_both_flags() {
        let flags = EnvFlags::from_lookup(|name| match name {
            CHECK_DOCS => Some("1".to_string()),
            _ => None,
        });
        assert!(flags.check_docs);
        assert!(!flags.check_formatting);

        let flags = EnvFlags::from_lookup(|name| match name {
            CHECK_FORMATTING => Some("1".to_string()),
            _ => None,
        });
        assert!(!flags.check_docs);
        assert!(flags.check_formatting);
    }

    #[test]
    fn unset_means_test_path_without_formatting() {
        let flags = EnvFlags::from_lookup(|_| None);
        assert_eq!(flags, EnvFlags::default());
    }
}
