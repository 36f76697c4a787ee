//! The searchable plaintext form of a converted document.
//!
//! Search terms compile to whole-word patterns over this exact alphabet,
//! so anything written into the data directory must go through
//! [`minify`] first.

use std::sync::LazyLock;

use regex::Regex;

static HYPHENATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*\r?\n\s").expect("valid regex"));
static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("valid regex"));
static REFERENCES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[0-9]+\]").expect("valid regex"));
static URLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://|www\.)[a-zA-Z0-9./]+").expect("valid regex")
});
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.:;,()]").expect("valid regex"));
static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\"'‘’“”]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize extracted document text for searching.
///
/// Words hyphenated across a line break are rejoined, line breaks become
/// spaces, numeric references like `[12]` and URLs are dropped, the
/// punctuation `. : ; , ( )` and quote characters are removed, whitespace
/// runs collapse to one space, and everything is lowercased.
///
/// # Examples
///
/// ```
/// use litdex::minify::minify;
///
/// let text = "Deep learn-\n ing [3] works (see www.example.org).";
/// assert_eq!(minify(text), "deep learning works see");
/// ```
pub fn minify(text: &str) -> String {
    let text = HYPHENATION.replace_all(text, "");
    let text = NEWLINES.replace_all(&text, " ");
    let text = REFERENCES.replace_all(&text, "");
    let text = URLS.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, "");
    let text = QUOTES.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_lowercase()
}
