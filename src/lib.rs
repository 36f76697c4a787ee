//! litdex - full-text search over a bibliographic library.
//!
//! litdex keeps a project file with one entry per bibliographic record
//! (title, publication, year, authors, attached source documents). Source
//! documents are converted into minified plaintext, and searches count
//! whole-word terms or raw regular expressions in that text, filtered by
//! year range, author, and publication.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use litdex::{Project, SearchConfig, TracingDiagnostics, search};
//!
//! let mut project = Project::load(Path::new("library.json")).unwrap();
//! let index = project.build_index(&TracingDiagnostics).unwrap();
//!
//! let config = SearchConfig {
//!     terms: vec!["deep learning".to_string()],
//!     start: 2010,
//!     end: 2020,
//!     ..SearchConfig::default()
//! };
//!
//! for r in search::search(&index, &config, &TracingDiagnostics).unwrap() {
//!     println!("{} x{}: {}", r.query, r.occurrences, r.record);
//! }
//! ```

pub mod convert;
pub mod data_dir;
pub mod diagnostics;
pub mod error;
pub mod import;
pub mod index;
pub mod minify;
pub mod output;
pub mod project;
pub mod query;
pub mod record;
pub mod reduced;
pub mod resolve;
pub mod search;

pub use data_dir::DataDir;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use index::{EntryId, ProjectIndex};
pub use project::{Project, ProjectEntry};
pub use query::SearchConfig;
pub use record::{Record, RecordHash};
pub use resolve::{Specifier, resolve};
pub use search::SearchResult;
