use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures surfaced by the loader, engine, writer and renderer.
///
/// Row-level parse problems never show up here: the loader drops those rows
/// and only reports a count.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty sample set, malformed frequency grid, or unusable numbers.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unreadable input or unwritable output.
    #[error("I/O failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("render failed: {0}")]
    Render(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
