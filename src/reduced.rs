//! Reduced strings: the lowercase, alphanumeric-only form used as a
//! lookup key wherever two spellings of the same title, author, or
//! publication should compare equal.
//!
//! Reduction is lossy on purpose. "Nature", "NATURE." and "[Nature]" all
//! share the key `nature`.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Lowercase `s` and strip every character outside `[a-z0-9]`.
///
/// # Examples
///
/// ```
/// use litdex::reduced::reduce;
///
/// assert_eq!(reduce("Deep Learning: A Review!"), "deeplearningareview");
/// assert_eq!(reduce("--"), "");
/// ```
pub fn reduce(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// A string paired with its reduced form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReducedStr {
    /// The string as it was supplied.
    pub original: String,
    /// Lowercase, alphanumeric-only key.
    pub reduced: String,
}

impl ReducedStr {
    /// Reduce `s`, failing when a non-empty input has nothing left.
    ///
    /// `kind` names the field for the error message ("title", "author").
    pub fn new(kind: &'static str, s: &str) -> Result<Self> {
        let reduced = reduce(s);
        if !s.is_empty() && reduced.is_empty() {
            return Err(Error::EmptyReduction {
                kind,
                value: s.to_string(),
            });
        }
        Ok(Self {
            original: s.to_string(),
            reduced,
        })
    }
}

impl fmt::Display for ReducedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn reduce_strips_case_and_punctuation() {
        assert_eq!(reduce("Hello, World!"), "helloworld");
        assert_eq!(reduce("J. Appl. Phys. (2001)"), "japplphys2001");
    }

    #[test]
    fn reduce_drops_non_ascii() {
        assert_eq!(reduce("Schrödinger"), "schrdinger");
    }

    #[test]
    fn reduced_str_keeps_original() {
        let r = ReducedStr::new("title", "Deep Learning").unwrap();
        assert_eq!(r.original, "Deep Learning");
        assert_eq!(r.reduced, "deeplearning");
        assert_eq!(r.to_string(), "Deep Learning");
    }

    #[test]
    fn punctuation_only_is_an_error() {
        let err = ReducedStr::new("title", "?!...").unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyReduction { kind: "title", .. }
        ));
    }

    #[test]
    fn empty_input_is_allowed() {
        let r = ReducedStr::new("author", "").unwrap();
        assert!(r.reduced.is_empty());
    }

    proptest! {
        #[test]
        fn reduce_is_idempotent(s in "\\PC*") {
            let once = reduce(&s);
            prop_assert_eq!(reduce(&once), once.clone());
        }

        #[test]
        fn reduce_output_is_lower_alnum(s in "\\PC*") {
            prop_assert!(reduce(&s)
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
