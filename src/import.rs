//! Loading already-extracted records into a new project.
//!
//! The input is a JSON array of [`Record`] values, as produced by an
//! upstream exporter. Incomplete records, records in unwanted
//! languages, and records whose hash repeats an earlier one are dropped
//! here, so the project's entry list starts out free of duplicates.

use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use crate::{diagnostics::Diagnostics, error::Result, record::Record};

/// Read records from `path` and filter them; see [`filter_records`].
pub fn load_records(
    path: &Path,
    langs: &[String],
    diag: &dyn Diagnostics,
) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<Record> = serde_json::from_reader(reader)?;
    Ok(filter_records(records, langs, diag))
}

/// Keep complete records written in one of `langs` (any language when
/// `langs` is empty), dropping later records whose hash was already
/// seen.
pub fn filter_records(
    records: Vec<Record>,
    langs: &[String],
    diag: &dyn Diagnostics,
) -> Vec<Record> {
    let langs: Vec<String> = langs.iter().map(|l| l.to_lowercase()).collect();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        if let Some(field) = record.incomplete_field() {
            diag.warn(&format!("Skipping record missing {field}: {record}"));
            continue;
        }

        if !record.is_written_in(&langs) {
            diag.debug(&format!(
                "Not including due to language \"{}\": {record}",
                record.language
            ));
            continue;
        }

        if !seen.insert(record.hash()) {
            diag.debug(&format!("Not including potential duplicate: {record}"));
            continue;
        }

        diag.trace(&format!("Loaded record: {record}"));
        kept.push(record);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::{CaptureDiagnostics, Level},
        record::tests::record,
    };

    #[test]
    fn drops_incomplete_records() {
        let mut no_authors = record("T", "P", 2000, &[]);
        no_authors.authors.clear();
        let diag = CaptureDiagnostics::new();

        let kept = filter_records(
            vec![no_authors, record("Fine", "P", 2000, &["A"])],
            &[],
            &diag,
        );

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Fine");
        assert!(diag.at(Level::Warn)[0].contains("missing authors"));
    }

    #[test]
    fn filters_by_language() {
        let mut german = record("Ein Titel", "P", 2000, &["A"]);
        german.language = "ger".into();
        let mut english = record("A Title", "P", 2000, &["A"]);
        english.language = "English".into();
        let unknown = record("Unknown", "P", 2000, &["A"]);

        let kept = filter_records(
            vec![german, english, unknown],
            &["ENGLISH".to_string()],
            &CaptureDiagnostics::new(),
        );

        let titles: Vec<&str> = kept.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A Title", "Unknown"]);
    }

    #[test]
    fn drops_duplicate_hashes() {
        let kept = filter_records(
            vec![
                record("Deep Learning", "Nature", 2015, &["Smith"]),
                record("DEEP LEARNING.", "Nat. Rev.", 2015, &["Jones"]),
            ],
            &[],
            &CaptureDiagnostics::new(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].authors, vec!["Smith"]);
    }

    #[test]
    fn loads_json_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{
                "title": "Deep Learning",
                "publication": "Nature",
                "year": 2015,
                "authors": ["Smith"],
                "language": "eng",
                "files": ["/library/deep.pdf"]
            }]"#,
        )
        .unwrap();

        let records =
            load_records(&path, &[], &CaptureDiagnostics::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].files[0].to_str(), Some("/library/deep.pdf"));
    }
}
