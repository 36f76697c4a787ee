use std::{fmt, path::PathBuf, str::FromStr};

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    reduced::reduce,
};

const FIELD_SEP: u8 = b'|';

/// Bibliographic metadata for one publication, plus the paths of its
/// full-text source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Article or book title.
    pub title: String,
    /// Journal, proceedings, or publisher name.
    pub publication: String,
    /// Publication year.
    pub year: u32,
    /// Authors in display order.
    pub authors: Vec<String>,
    /// Language of the text. Empty matches any language filter.
    #[serde(default)]
    pub language: String,
    /// Absolute paths of the full-text source documents.
    pub files: Vec<PathBuf>,
}

impl Record {
    /// Name of the first required field that is missing, if any.
    pub fn incomplete_field(&self) -> Option<&'static str> {
        if self.title.is_empty() {
            Some("title")
        } else if self.publication.is_empty() {
            Some("publication")
        } else if self.year == 0 {
            Some("year")
        } else if self.authors.is_empty() {
            Some("authors")
        } else if self.files.is_empty() {
            Some("files")
        } else {
            None
        }
    }

    /// Whether the record is written in one of `langs`.
    ///
    /// `langs` must already be lowercase. A record without a language, or
    /// an empty `langs`, always matches.
    pub fn is_written_in(&self, langs: &[String]) -> bool {
        if self.language.is_empty() || langs.is_empty() {
            return true;
        }
        let lang = self.language.to_lowercase();
        langs.iter().any(|l| *l == lang)
    }

    /// Fingerprint over the reduced title, the first character of the
    /// reduced publication, the year, and the number of authors.
    ///
    /// Records that differ only in capitalization, punctuation, or the
    /// abbreviation of the publication name share a hash. That makes the
    /// hash usable for spotting duplicates across library exports, at
    /// the cost of occasionally merging distinct records.
    pub fn hash(&self) -> RecordHash {
        let title = reduce(&self.title);
        let publication = reduce(&self.publication);
        let pub_initial = publication.as_bytes().first().copied().unwrap_or(0);
        let year = (self.year as u16).to_le_bytes();

        let mut hasher = Md5::new();
        hasher.update(title.as_bytes());
        hasher.update([FIELD_SEP]);
        hasher.update([pub_initial]);
        hasher.update([FIELD_SEP]);
        hasher.update(year);
        hasher.update([FIELD_SEP]);
        hasher.update([self.authors.len() as u8]);
        hasher.update([FIELD_SEP]);

        RecordHash(hasher.finalize().into())
    }

    /// Lowercase hex form of [`Record::hash`].
    pub fn hash_string(&self) -> String {
        self.hash().to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" [{}] ({} {})",
            self.title,
            self.authors.join(", "),
            self.publication,
            self.year
        )
    }
}

/// MD5 digest of a record's reduced identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHash(pub [u8; 16]);

impl fmt::Display for RecordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for RecordHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidHash(format!("\"{s}\": {e}")))?;
        Ok(Self(bytes))
    }
}
