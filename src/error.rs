use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("project file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("{kind} \"{value}\" reduces to an empty string")]
    EmptyReduction { kind: &'static str, value: String },

    #[error("invalid record hash: {0}")]
    InvalidHash(String),

    #[error("invalid year range: start ({start}) is after end ({end})")]
    InvalidRange { start: u32, end: u32 },

    #[error("no record matches {0}")]
    Unresolved(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("data directory does not exist and could not be created: {0}")]
    DataDir(PathBuf),

    #[error("text extraction failed for {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },
}
