use crate::remote::error::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The remote directory holds no archive for the station; the station has no data there.
    #[error("No archive matching '{stem}' in remote directory '{directory}'")]
    NotFound { directory: String, stem: String },

    #[error("Archive '{path}' is corrupt")]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive '{0}' has no data member")]
    MissingDataMember(PathBuf),

    #[error("Failed to download archive")]
    Fetch(#[from] FetchError),

    #[error("Failed to list cache directory '{0}'")]
    CacheList(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete cache file '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("I/O error extracting '{0}'")]
    ExtractIo(PathBuf, #[source] std::io::Error),

    #[error("Background task was cancelled")]
    Cancelled,

    #[error("Background task failed to complete")]
    TaskJoin(#[source] tokio::task::JoinError),
}

impl From<tokio::task::JoinError> for ArchiveError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            ArchiveError::Cancelled
        } else {
            ArchiveError::TaskJoin(e)
        }
    }
}
