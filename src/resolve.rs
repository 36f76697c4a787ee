//! Turning user-supplied specifiers into project entries.
//!
//! A specifier names an entry by title, author, publication, year, or
//! hash. Fields are tried in that fixed order and the first one that
//! matches anything decides the result for that specifier.

use std::{collections::HashSet, fmt};

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    index::{EntryId, ProjectIndex},
    record::RecordHash,
    reduced::ReducedStr,
};

/// One selection criterion. Unset fields are empty strings or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifier {
    pub title: String,
    pub author: String,
    pub publication: String,
    pub year: Option<u32>,
    pub hash: String,
}

impl Specifier {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn publication(publication: impl Into<String>) -> Self {
        Self {
            publication: publication.into(),
            ..Self::default()
        }
    }

    pub fn year(year: u32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn hash(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "title: \"{}\", author: \"{}\", publication: \"{}\", year: {}, \
             hash: \"{}\"",
            self.title,
            self.author,
            self.publication,
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.hash
        )
    }
}

type Lookup = fn(&ProjectIndex, &Specifier) -> Result<Option<Vec<EntryId>>>;

/// Resolution priority. Each lookup returns `None` when its field is not
/// set on the specifier, and the (possibly empty) matches otherwise.
const LOOKUPS: &[(&str, Lookup)] = &[
    ("title", by_title),
    ("author", by_author),
    ("publication", by_publication),
    ("year", by_year),
    ("hash", by_hash),
];

fn by_title(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    if spec.title.is_empty() {
        return Ok(None);
    }
    let key = ReducedStr::new("title", &spec.title)?;
    Ok(Some(index.by_title(&key.reduced).to_vec()))
}

fn by_author(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    if spec.author.is_empty() {
        return Ok(None);
    }
    let key = ReducedStr::new("author", &spec.author)?;
    Ok(Some(index.by_author(&key.reduced).to_vec()))
}

fn by_publication(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    if spec.publication.is_empty() {
        return Ok(None);
    }
    let key = ReducedStr::new("publication", &spec.publication)?;
    Ok(Some(index.by_publication(&key.reduced).to_vec()))
}

fn by_year(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    Ok(spec.year.map(|year| index.by_year(year).to_vec()))
}

fn by_hash(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    if spec.hash.is_empty() {
        return Ok(None);
    }
    let hash: RecordHash = spec.hash.parse()?;
    Ok(Some(index.by_hash(&hash).into_iter().collect()))
}

/// Resolve every specifier against `index`.
///
/// Returns the union of the matches in specifier order, each entry at
/// most once. Fails on the first specifier that matches nothing; no
/// partial result is returned. An empty `specifiers` yields an empty
/// list; callers that want "everything" for that case must say so.
pub fn resolve(
    index: &ProjectIndex,
    specifiers: &[Specifier],
    diag: &dyn Diagnostics,
) -> Result<Vec<EntryId>> {
    let mut collected = Vec::new();
    let mut seen = HashSet::new();

    for spec in specifiers {
        let ids = resolve_one(index, spec)?
            .ok_or_else(|| Error::Unresolved(spec.to_string()))?;

        for id in ids {
            if seen.insert(id) {
                diag.debug(&format!(
                    "Selected {}",
                    index.entry(id).record
                ));
                collected.push(id);
            } else {
                diag.debug(&format!(
                    "Already selected {}",
                    index.entry(id).record
                ));
            }
        }
    }

    Ok(collected)
}

/// The ids from the first lookup that matches, if any does.
fn resolve_one(
    index: &ProjectIndex,
    spec: &Specifier,
) -> Result<Option<Vec<EntryId>>> {
    for (_field, lookup) in LOOKUPS {
        if let Some(ids) = lookup(index, spec)?
            && !ids.is_empty()
        {
            return Ok(Some(ids));
        }
    }
    Ok(None)
}
