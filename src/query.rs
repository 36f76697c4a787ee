use regex::Regex;

use crate::{
    error::{Error, Result},
    reduced::reduce,
};

/// Earliest year searched when the caller gives no lower bound.
pub const DEFAULT_START_YEAR: u32 = 1;

/// Latest year searched when the caller gives no upper bound.
pub const DEFAULT_END_YEAR: u32 = 3030;

/// A search request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Words or phrases matched on whole-word boundaries.
    pub terms: Vec<String>,
    /// Raw regular expressions matched against the minified text.
    pub regexps: Vec<String>,
    /// Only search entries with one of these authors.
    pub authors: Vec<String>,
    /// Only search entries from one of these publications.
    pub publications: Vec<String>,
    /// First year searched, inclusive.
    pub start: u32,
    /// Last year searched, inclusive.
    pub end: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            regexps: Vec::new(),
            authors: Vec::new(),
            publications: Vec::new(),
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

/// A compiled pattern and the label reported with its results.
#[derive(Debug, Clone)]
pub struct Query {
    pub label: String,
    pub regex: Regex,
}

/// A [`SearchConfig`] with its patterns compiled and filters reduced.
#[derive(Debug, Clone)]
pub struct CompiledSearch {
    /// Regex-derived queries first, then term-derived ones.
    pub queries: Vec<Query>,
    /// Reduced author filters.
    pub authors: Vec<String>,
    /// Reduced publication filters.
    pub publications: Vec<String>,
}

/// Compile every pattern and reduce every filter in `config`.
///
/// The first invalid regular expression, empty term, or unreducible
/// filter aborts compilation.
pub fn compile(config: &SearchConfig) -> Result<CompiledSearch> {
    let mut queries =
        Vec::with_capacity(config.regexps.len() + config.terms.len());

    for pattern in &config.regexps {
        queries.push(Query {
            label: format!("regexp{{{pattern}}}"),
            regex: Regex::new(pattern)?,
        });
    }

    for term in &config.terms {
        let cleaned = clean_term(term);
        if cleaned.is_empty() {
            return Err(Error::EmptyReduction {
                kind: "term",
                value: term.clone(),
            });
        }
        queries.push(Query {
            regex: Regex::new(&term_pattern(&cleaned))?,
            label: cleaned,
        });
    }

    Ok(CompiledSearch {
        queries,
        authors: reduce_filters("author", &config.authors)?,
        publications: reduce_filters("publication", &config.publications)?,
    })
}

/// Reduce a free-text term to the alphabet of minified text: lowercase
/// letters, digits, and single spaces.
pub fn clean_term(term: &str) -> String {
    let kept: String = term
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    kept.split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-word pattern for a cleaned term.
fn term_pattern(cleaned: &str) -> String {
    format!("(^| ){cleaned}( |$)")
}

fn reduce_filters(
    kind: &'static str,
    values: &[String],
) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| {
            let reduced = reduce(value);
            if reduced.is_empty() {
                Err(Error::EmptyReduction {
                    kind,
                    value: value.clone(),
                })
            } else {
                Ok(reduced)
            }
        })
        .collect()
}
