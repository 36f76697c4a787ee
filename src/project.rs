use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    index::ProjectIndex,
    record::Record,
};

/// A record together with its identity hash and converted text files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub record: Record,
    /// Hex form of [`Record::hash`].
    pub hash: String,
    /// Minified text files used for searching. Empty until converted.
    #[serde(default)]
    pub mini_files: Vec<PathBuf>,
}

impl ProjectEntry {
    pub fn new(record: Record) -> Self {
        let hash = record.hash_string();
        Self {
            record,
            hash,
            mini_files: Vec::new(),
        }
    }
}

/// The persisted state of a library: where converted text lives and the
/// flat list of entries. Lookup structures are rebuilt on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// RFC 3339 timestamp of the last save.
    pub created_at: String,
    /// Version of litdex that wrote the file.
    pub version: String,
    /// Directory that holds converted text files.
    pub data_dir: PathBuf,
    pub entries: Vec<ProjectEntry>,
}

impl Project {
    /// Create a project over `records`. `data_dir` should be absolute;
    /// see [`crate::data_dir::DataDir::resolve`].
    pub fn new(data_dir: PathBuf, records: Vec<Record>) -> Self {
        Self {
            created_at: now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir,
            entries: records.into_iter().map(ProjectEntry::new).collect(),
        }
    }

    /// Read a project file. Fails if its data directory is gone.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound {
                kind: "project file",
                name: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        let reader = BufReader::new(file);
        let project: Self = serde_json::from_reader(reader)?;

        if !project.data_dir.is_dir() {
            return Err(Error::DataDir(project.data_dir));
        }

        Ok(project)
    }

    /// Write the project as pretty JSON, creating the parent and data
    /// directories as needed. Refreshes `created_at`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|_| Error::DataDir(self.data_dir.clone()))?;

        self.created_at = now();

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Move the entries into a freshly built index.
    ///
    /// Hand the index back with [`Project::restore_entries`] before
    /// saving, or the saved project will be empty.
    pub fn build_index(
        &mut self,
        diag: &dyn Diagnostics,
    ) -> Result<ProjectIndex> {
        ProjectIndex::build(std::mem::take(&mut self.entries), diag)
    }

    /// Take the entries back from an index, including any conversion
    /// results written into it.
    pub fn restore_entries(&mut self, index: ProjectIndex) {
        self.entries = index.into_entries();
    }
}

fn now() -> String {
    chrono::Local::now().to_rfc3339()
}
