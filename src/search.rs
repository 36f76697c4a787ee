use std::collections::HashSet;

use serde::Serialize;

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    index::ProjectIndex,
    project::ProjectEntry,
    query::{self, CompiledSearch, SearchConfig},
    record::Record,
    reduced::reduce,
};

/// Occurrences of one query in one converted text file of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub occurrences: usize,
    pub record: Record,
}

/// Author and publication restrictions. An empty set admits everything.
struct Filter {
    authors: HashSet<String>,
    publications: HashSet<String>,
}

impl Filter {
    fn new(compiled: &CompiledSearch) -> Self {
        Self {
            authors: compiled.authors.iter().cloned().collect(),
            publications: compiled.publications.iter().cloned().collect(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        if !self.publications.is_empty()
            && !self.publications.contains(&reduce(&record.publication))
        {
            return false;
        }

        if !self.authors.is_empty() {
            return record
                .authors
                .iter()
                .any(|a| self.authors.contains(&reduce(a)));
        }

        true
    }
}

/// Run `config` against every entry in the configured year range.
///
/// Results come out ordered by year, then by position within the year,
/// then by text file, then by query. Entries without converted text are
/// reported and skipped. A text file that cannot be read aborts the
/// whole search, since it means the project and the data directory have
/// drifted apart.
pub fn search(
    index: &ProjectIndex,
    config: &SearchConfig,
    diag: &dyn Diagnostics,
) -> Result<Vec<SearchResult>> {
    let compiled = query::compile(config)?;

    if config.start > config.end {
        return Err(Error::InvalidRange {
            start: config.start,
            end: config.end,
        });
    }

    let filter = Filter::new(&compiled);
    let mut results = Vec::new();

    let range = config.start..=config.end;
    let mut years: Vec<u32> = index
        .years()
        .iter()
        .copied()
        .filter(|year| range.contains(year))
        .collect();
    years.sort_unstable();

    for year in years {
        for &id in index.by_year(year) {
            let entry = index.entry(id);
            if !filter.matches(&entry.record) {
                continue;
            }
            diag.trace(&format!("Filter matched {}", entry.record));
            search_entry(&compiled, entry, diag, &mut results)?;
        }
    }

    Ok(results)
}

fn search_entry(
    compiled: &CompiledSearch,
    entry: &ProjectEntry,
    diag: &dyn Diagnostics,
    results: &mut Vec<SearchResult>,
) -> Result<()> {
    if entry.mini_files.is_empty() {
        diag.error(&format!(
            "No converted text available for {}",
            entry.record
        ));
        return Ok(());
    }

    diag.debug(&format!("Searching {}", entry.record));

    for file in &entry.mini_files {
        let bytes = std::fs::read(file)?;
        let text = String::from_utf8_lossy(&bytes);
        diag.trace(&format!("Loaded {}", file.display()));

        for q in &compiled.queries {
            let occurrences = q.regex.find_iter(&text).count();
            diag.trace(&format!(
                "Query \"{}\" found {occurrences} occurrence(s)",
                q.label
            ));
            if occurrences > 0 {
                results.push(SearchResult {
                    query: q.label.clone(),
                    occurrences,
                    record: entry.record.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::{CaptureDiagnostics, Level},
        index::tests::Library,
        record::tests::record,
    };

    fn deep_learning() -> Record {
        record("Deep Learning", "Nature", 2015, &["Smith"])
    }

    fn single_entry_library() -> (Library, ProjectIndex) {
        let mut lib = Library::new();
        lib.add_with_text(deep_learning(), "deep learning improves results");
        let index = lib.build(&CaptureDiagnostics::new());
        (lib, index)
    }

    fn terms(terms: &[&str]) -> SearchConfig {
        SearchConfig {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            ..SearchConfig::default()
        }
    }

    fn run(index: &ProjectIndex, config: &SearchConfig) -> Vec<SearchResult> {
        search(index, config, &CaptureDiagnostics::new()).unwrap()
    }

    #[test]
    fn single_term_single_year() {
        let (lib, index) = single_entry_library();
        let config = SearchConfig {
            start: 2015,
            end: 2015,
            ..terms(&["deep learning"])
        };

        assert_eq!(
            run(&index, &config),
            vec![SearchResult {
                query: "deep learning".into(),
                occurrences: 1,
                record: lib.entries[0].record.clone(),
            }]
        );
    }

    #[test]
    fn author_filter_excludes() {
        let (_lib, index) = single_entry_library();
        let config = SearchConfig {
            authors: vec!["Jones".into()],
            ..terms(&["deep learning"])
        };
        assert!(run(&index, &config).is_empty());
    }

    #[test]
    fn author_filter_matches_any_author() {
        let mut lib = Library::new();
        lib.add_with_text(
            record("Paper", "Nature", 2015, &["Jones", "Smith, J."]),
            "graph results",
        );
        let index = lib.build(&CaptureDiagnostics::new());

        let config = SearchConfig {
            authors: vec!["SMITH J".into()],
            ..terms(&["results"])
        };
        assert_eq!(run(&index, &config).len(), 1);
    }

    #[test]
    fn publication_and_author_filters_combine() {
        let mut lib = Library::new();
        lib.add_with_text(
            record("A", "Nature", 2015, &["Smith"]),
            "shared phrase",
        );
        lib.add_with_text(
            record("B", "Science", 2015, &["Smith"]),
            "shared phrase",
        );
        lib.add_with_text(
            record("C", "Nature", 2015, &["Jones"]),
            "shared phrase",
        );
        let index = lib.build(&CaptureDiagnostics::new());

        let config = SearchConfig {
            authors: vec!["smith".into()],
            publications: vec!["nature".into()],
            ..terms(&["shared phrase"])
        };
        let titles: Vec<String> = run(&index, &config)
            .into_iter()
            .map(|r| r.record.title)
            .collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let mut lib = Library::new();
        for (title, year) in [("A", 2014), ("B", 2015), ("C", 2016)] {
            lib.add_with_text(
                record(title, "Nature", year, &["Smith"]),
                "needle",
            );
        }
        let index = lib.build(&CaptureDiagnostics::new());

        let only_2015 = SearchConfig {
            start: 2015,
            end: 2015,
            ..terms(&["needle"])
        };
        let results = run(&index, &only_2015);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.year, 2015);

        let from_2015 = SearchConfig {
            start: 2015,
            ..terms(&["needle"])
        };
        assert_eq!(run(&index, &from_2015).len(), 2);
    }

    #[test]
    fn widest_range_only_visits_indexed_years() {
        let (_lib, index) = single_entry_library();
        let config = SearchConfig {
            start: 0,
            end: u32::MAX,
            ..terms(&["deep learning"])
        };

        let started = std::time::Instant::now();
        let results = run(&index, &config);
        assert_eq!(results.len(), 1);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn inverted_range_is_an_error() {
        let (_lib, index) = single_entry_library();
        let config = SearchConfig {
            start: 2016,
            end: 2015,
            ..terms(&["deep"])
        };
        let err =
            search(&index, &config, &CaptureDiagnostics::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRange {
                start: 2016,
                end: 2015
            }
        ));
    }

    #[test]
    fn compile_errors_surface_first() {
        let (_lib, index) = single_entry_library();
        let config = SearchConfig {
            regexps: vec!["[".into()],
            start: 2016,
            end: 2015,
            ..SearchConfig::default()
        };
        let err =
            search(&index, &config, &CaptureDiagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::Regex(_)));
    }

    #[test]
    fn counts_every_occurrence_per_query() {
        let mut lib = Library::new();
        lib.add_with_text(
            deep_learning(),
            "deep learning and more deep learning with deep nets",
        );
        let index = lib.build(&CaptureDiagnostics::new());

        let config = SearchConfig {
            regexps: vec!["deep".into()],
            ..terms(&["deep learning", "absent"])
        };
        let results = run(&index, &config);
        let summary: Vec<(&str, usize)> = results
            .iter()
            .map(|r| (r.query.as_str(), r.occurrences))
            .collect();
        assert_eq!(summary, vec![("regexp{deep}", 3), ("deep learning", 2)]);
    }

    #[test]
    fn each_text_file_reports_separately() {
        let mut lib = Library::new();
        lib.add_with_text(deep_learning(), "needle one");
        let extra = lib.dir.path().join("extra.txt");
        std::fs::write(&extra, "needle two needle").unwrap();
        lib.entries[0].mini_files.push(extra);
        let index = lib.build(&CaptureDiagnostics::new());

        let counts: Vec<usize> = run(&index, &terms(&["needle"]))
            .iter()
            .map(|r| r.occurrences)
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn unconverted_entry_is_skipped_with_error_log() {
        let mut lib = Library::new();
        lib.add(deep_learning());
        let index = lib.build(&CaptureDiagnostics::new());

        let diag = CaptureDiagnostics::new();
        let results = search(&index, &terms(&["deep"]), &diag).unwrap();
        assert!(results.is_empty());
        assert!(diag.at(Level::Error)[0].contains("No converted text"));
    }

    #[test]
    fn missing_text_file_aborts_search() {
        let mut lib = Library::new();
        lib.add(deep_learning())
            .mini_files
            .push("/no/such/converted.txt".into());
        let index = lib.build(&CaptureDiagnostics::new());

        let err = search(&index, &terms(&["deep"]), &CaptureDiagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn results_follow_year_then_bucket_order() {
        let mut lib = Library::new();
        lib.add_with_text(record("Late", "Nature", 2020, &["A"]), "needle");
        lib.add_with_text(record("Early", "Nature", 2010, &["B"]), "needle");
        lib.add_with_text(record("Early 2", "Nature", 2010, &["C"]), "needle");
        let index = lib.build(&CaptureDiagnostics::new());

        let titles: Vec<String> = run(&index, &terms(&["needle"]))
            .into_iter()
            .map(|r| r.record.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Early 2", "Late"]);
    }
}
