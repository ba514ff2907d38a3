use std::path::PathBuf;

/// Errors produced while loading a catalog, building vectors or ranking.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// No usable rows survived loading. Fatal at startup.
    #[error("catalog has no complete entries")]
    EmptyCatalog,

    /// The query title is not in the catalog; callers fall back externally.
    #[error("unknown title: {0}")]
    UnknownTitle(String),

    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
