use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory holding the converted text files of a project.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory from, in order of priority:
    /// 1. An explicit path (from --data-dir)
    /// 2. The LITDEX_DATA_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/litdex/)
    ///
    /// Relative paths are anchored at the current directory, since the
    /// project file stores the path and may be used from elsewhere. The
    /// directory is created if needed.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("LITDEX_DATA_DIR") {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("litdex")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
        };

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(root)
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn into_path(self) -> PathBuf {
        self.root
    }

    /// Where the minified text for `source` goes:
    /// `<root>/<source's parent dir name>/<source file name>.txt`.
    ///
    /// Keeping the parent directory name avoids collisions between
    /// libraries that store every attachment as `full.pdf` under a
    /// per-record folder.
    pub fn text_path(root: &Path, source: &Path) -> PathBuf {
        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".txt");

        match source.parent().and_then(Path::file_name) {
            Some(parent) => root.join(parent).join(name),
            None => root.join(name),
        }
    }
}
