//! In-memory lookup structures over a project's entries.
//!
//! Entries live in a single arena and are addressed by [`EntryId`]. Every
//! secondary index stores ids, never copies, so conversion results
//! written through [`ProjectIndex::entry_mut`] are visible from all of
//! them.

use std::{
    borrow::Borrow,
    collections::{HashMap, hash_map},
    hash::Hash,
    path::Path,
};

use crate::{
    diagnostics::Diagnostics,
    error::Result,
    project::ProjectEntry,
    record::RecordHash,
    reduced::ReducedStr,
};

/// Converted text files at or below this size (bytes) usually mean the
/// extractor only found a cover page or a copyright notice.
pub const SHORT_TEXT_THRESHOLD: u64 = 2000;

/// Stable position of an entry in the project's entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Key → ordered entry ids, plus the distinct keys in first-seen order.
///
/// `D` is what gets remembered for enumeration; for reduced string keys
/// that is the first original spelling encountered.
#[derive(Debug)]
struct Buckets<K, D = K> {
    seen: Vec<D>,
    map: HashMap<K, Vec<EntryId>>,
}

impl<K, D> Default for Buckets<K, D> {
    fn default() -> Self {
        Self {
            seen: Vec::new(),
            map: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq, D> Buckets<K, D> {
    /// Append `id` under `key`. Returns true when the key is new.
    fn insert(&mut self, key: K, display: D, id: EntryId) -> bool {
        match self.map.entry(key) {
            hash_map::Entry::Occupied(mut bucket) => {
                let ids = bucket.get_mut();
                // An entry listing the same author twice lands here once.
                if ids.last() != Some(&id) {
                    ids.push(id);
                }
                false
            }
            hash_map::Entry::Vacant(slot) => {
                slot.insert(vec![id]);
                self.seen.push(display);
                true
            }
        }
    }

    fn get<Q>(&self, key: &Q) -> &[EntryId]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

/// The project's entries and their five lookup structures.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    entries: Vec<ProjectEntry>,
    indexed: Vec<EntryId>,

    hashes: Vec<RecordHash>,
    by_hash: HashMap<RecordHash, EntryId>,

    years: Buckets<u32>,
    titles: Buckets<String, String>,
    authors: Buckets<String, String>,
    publications: Buckets<String, String>,
}

impl ProjectIndex {
    /// Index `entries` in order.
    ///
    /// Entries whose source files are missing, and entries whose hash is
    /// already taken by an earlier entry, are reported through `diag` and
    /// left out of every lookup structure. They stay in the entry list so
    /// that saving the project writes them back unchanged.
    ///
    /// Fails if a title, author, or publication reduces to an empty key.
    pub fn build(
        entries: Vec<ProjectEntry>,
        diag: &dyn Diagnostics,
    ) -> Result<Self> {
        let mut index = Self {
            entries,
            ..Self::default()
        };

        for i in 0..index.entries.len() {
            index.insert(EntryId(i), diag)?;
        }

        diag.debug(&format!(
            "Indexed {} of {} entries ({} years, {} titles, {} authors, \
             {} publications)",
            index.indexed.len(),
            index.entries.len(),
            index.years.seen.len(),
            index.titles.seen.len(),
            index.authors.seen.len(),
            index.publications.seen.len(),
        ));

        Ok(index)
    }

    fn insert(&mut self, id: EntryId, diag: &dyn Diagnostics) -> Result<()> {
        let entry = &self.entries[id.0];
        let record = &entry.record;

        warn_short_texts(entry, diag);

        if let Some(missing) =
            record.files.iter().find(|f| is_missing(f.as_path()))
        {
            diag.error(&format!(
                "Source file does not exist: {}",
                missing.display()
            ));
            diag.debug(&format!("Skipping record: {record}"));
            return Ok(());
        }

        // Reduce everything up front so a bad field leaves no partial
        // bucket state behind.
        let title = ReducedStr::new("title", &record.title)?;
        let publication = ReducedStr::new("publication", &record.publication)?;
        let authors = record
            .authors
            .iter()
            .map(|a| ReducedStr::new("author", a))
            .collect::<Result<Vec<_>>>()?;

        let hash = record.hash();
        if let Some(&existing) = self.by_hash.get(&hash) {
            diag.warn(&format!(
                "Record {record} has the same hash ({hash}) as {}; \
                 treating it as a duplicate",
                self.entries[existing.0].record
            ));
            return Ok(());
        }

        diag.trace(&format!("Loading entry for {record}"));

        self.by_hash.insert(hash, id);
        self.hashes.push(hash);
        self.indexed.push(id);

        if self.years.insert(record.year, record.year, id) {
            diag.trace(&format!("New year bucket: {}", record.year));
        }
        if self.titles.insert(title.reduced, title.original, id) {
            diag.trace("New title bucket");
        }
        for author in authors {
            if self.authors.insert(author.reduced, author.original, id) {
                diag.trace("New author bucket");
            }
        }
        if self
            .publications
            .insert(publication.reduced, publication.original, id)
        {
            diag.trace("New publication bucket");
        }

        Ok(())
    }

    pub fn entry(&self, id: EntryId) -> &ProjectEntry {
        &self.entries[id.0]
    }

    pub fn entry_mut(&mut self, id: EntryId) -> &mut ProjectEntry {
        &mut self.entries[id.0]
    }

    /// Every entry, indexed or not, in project order.
    pub fn entries(&self) -> &[ProjectEntry] {
        &self.entries
    }

    /// Ids of the entries that made it into the lookup structures.
    pub fn indexed(&self) -> &[EntryId] {
        &self.indexed
    }

    pub fn into_entries(self) -> Vec<ProjectEntry> {
        self.entries
    }

    pub fn by_hash(&self, hash: &RecordHash) -> Option<EntryId> {
        self.by_hash.get(hash).copied()
    }

    pub fn by_year(&self, year: u32) -> &[EntryId] {
        self.years.get(&year)
    }

    /// Lookup by reduced title.
    pub fn by_title(&self, reduced: &str) -> &[EntryId] {
        self.titles.get(reduced)
    }

    /// Lookup by reduced author name.
    pub fn by_author(&self, reduced: &str) -> &[EntryId] {
        self.authors.get(reduced)
    }

    /// Lookup by reduced publication name.
    pub fn by_publication(&self, reduced: &str) -> &[EntryId] {
        self.publications.get(reduced)
    }

    /// Distinct years, in first-seen order.
    pub fn years(&self) -> &[u32] {
        &self.years.seen
    }

    /// Distinct titles (first spelling seen), in first-seen order.
    pub fn titles(&self) -> &[String] {
        &self.titles.seen
    }

    pub fn authors(&self) -> &[String] {
        &self.authors.seen
    }

    pub fn publications(&self) -> &[String] {
        &self.publications.seen
    }

    pub fn hashes(&self) -> &[RecordHash] {
        &self.hashes
    }
}

fn is_missing(path: &Path) -> bool {
    matches!(path.try_exists(), Ok(false))
}

fn warn_short_texts(entry: &ProjectEntry, diag: &dyn Diagnostics) {
    for file in &entry.mini_files {
        if let Ok(meta) = std::fs::metadata(file)
            && meta.len() <= SHORT_TEXT_THRESHOLD
        {
            diag.warn(&format!(
                "Converted text is suspiciously small ({} bytes); consider \
                 re-converting \"{}\" (hash {})",
                meta.len(),
                entry.record.title,
                entry.hash
            ));
        }
    }
}
