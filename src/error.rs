use std::path::PathBuf;

use thiserror::Error;

/// Why a data source produced no records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file '{}' not found", path.display())]
    SourceMissing { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("{0:#}")]
    Read(#[from] anyhow::Error),
}

/// Failure reading the optional JSON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
