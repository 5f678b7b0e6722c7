use crate::archive::error::ArchiveError;
use crate::config::ConfigError;
use crate::naming::error::NamingError;
use crate::remote::error::FetchError;
use crate::series::error::SeriesError;
use crate::stations::error::RosterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DwdError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}

impl DwdError {
    /// The remote has no archive for the requested station and variable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DwdError::Archive(ArchiveError::NotFound { .. }))
    }

    pub fn is_corrupt_archive(&self) -> bool {
        matches!(self, DwdError::Archive(ArchiveError::CorruptArchive { .. }))
    }

    /// Network or remote failure, on a roster, a listing or an archive.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            DwdError::Fetch(_)
                | DwdError::Roster(RosterError::Fetch(_))
                | DwdError::Archive(ArchiveError::Fetch(_))
        )
    }
}
