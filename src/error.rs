use std::path::PathBuf;

use thiserror::Error;

/// Errores que detienen el procesamiento de un documento.
#[derive(Debug, Error)]
pub enum WfebError {
    #[error("File '{}' does not exist.", .0.display())]
    FileNotFound(PathBuf),
    #[error("{entry} not found in {}", archive.display())]
    MissingEntry { archive: PathBuf, entry: String },
    #[error("Malformed XML in {}: {reason}", path.display())]
    MalformedXml { path: PathBuf, reason: String },
    #[error("'{}' is not a valid Office document: {source}", path.display())]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Entry '{entry}' in {} escapes the extraction directory", archive.display())]
    UnsafeEntry { archive: PathBuf, entry: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl WfebError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        WfebError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, WfebError>;
