use crate::archive::error::ArchiveError;
use crate::archive::extract::extract_data_member;
use crate::naming::resolver::NamingScheme;
use crate::remote::RemoteSource;
use crate::types::resolution::Era;
use crate::utils::{write_atomic, PathLocks};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};

/// One archive of a station, identified by its full remote name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    pub remote_dir: String,
    pub local_path: PathBuf,
    pub stem: String,
    pub remote_name: String,
}

impl ArchiveHandle {
    /// Where the extracted data member lives: the archive path with a `.txt` extension.
    pub fn data_path(&self) -> PathBuf {
        self.local_path.with_extension("txt")
    }
}

/// `stundenwerte_TU_00003` matches `stundenwerte_TU_00003_19500101_20201231_hist.zip` but not
/// `stundenwerte_TU_000031.zip`.
fn matches_stem(name: &str, stem: &str) -> bool {
    name.strip_prefix(stem)
        .is_some_and(|rest| rest.ends_with(".zip") && (rest.starts_with('_') || rest.starts_with('.')))
}

/// The era an archive belongs to, read from its remote name.
fn era_of(name: &str) -> Option<Era> {
    let stem = name.strip_suffix(".zip")?;
    if stem.ends_with("_hist") {
        Some(Era::Historical)
    } else if stem.ends_with("_akt") {
        Some(Era::Recent)
    } else if stem.ends_with("_now") {
        Some(Era::Now)
    } else {
        None
    }
}

/// Remote directory of an archive found in the cache. The family cache directory is shared by
/// all eras, so the era comes from the archive name rather than from the request.
fn cached_remote_dir(scheme: &NamingScheme, name: &str) -> String {
    match (scheme.era, era_of(name)) {
        (Some(_), Some(era)) => format!("{}/{}", scheme.description_directory, era.path_segment()),
        _ => scheme.directory.clone(),
    }
}

pub struct ArchiveCache {
    cache_dir: PathBuf,
    locks: PathLocks,
}

impl ArchiveCache {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            locks: PathLocks::default(),
        }
    }

    pub fn family_dir(&self, scheme: &NamingScheme) -> PathBuf {
        self.cache_dir.join(scheme.family_name())
    }

    async fn cached_archives(&self, dir: &Path, stem: &str) -> Result<Vec<String>, ArchiveError> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(ArchiveError::CacheList(dir.to_path_buf(), e)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ArchiveError::CacheList(dir.to_path_buf(), e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if matches_stem(&name, stem) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Makes sure the archives of `station_id` are cached and returns their handles.
    ///
    /// Without `force_refresh`, any cached archive matching the stem is taken as complete and
    /// the remote is not contacted. Otherwise the remote directory is listed and every matching
    /// archive is downloaded. No match at all is [`ArchiveError::NotFound`].
    pub async fn ensure_archives<R: RemoteSource>(
        &self,
        remote: &R,
        scheme: &NamingScheme,
        station_id: u32,
        force_refresh: bool,
    ) -> Result<Vec<ArchiveHandle>, ArchiveError> {
        let stem = scheme.archive_stem(station_id);
        let dir = self.family_dir(scheme);
        let handle = |remote_dir: String, name: String| ArchiveHandle {
            remote_dir,
            local_path: dir.join(&name),
            stem: stem.clone(),
            remote_name: name,
        };

        if !force_refresh {
            let cached = self.cached_archives(&dir, &stem).await?;
            if !cached.is_empty() {
                info!("Cache hit for {} ({} archives)", stem, cached.len());
                return Ok(cached
                    .into_iter()
                    .map(|name| handle(cached_remote_dir(scheme, &name), name))
                    .collect());
            }
        }

        let mut matched: Vec<String> = remote
            .list(&scheme.directory)
            .await?
            .into_iter()
            .filter(|name| matches_stem(name, &stem))
            .collect();
        matched.sort();
        if matched.is_empty() {
            return Err(ArchiveError::NotFound {
                directory: scheme.directory.clone(),
                stem: stem.clone(),
            });
        }
        debug!("Remote archives for {}: {:?}", stem, matched);

        let handles: Vec<ArchiveHandle> = matched
            .into_iter()
            .map(|name| handle(scheme.directory.clone(), name))
            .collect();
        for handle in &handles {
            let _guard = self.locks.lock(&handle.local_path).await;
            if force_refresh || tokio::fs::metadata(&handle.local_path).await.is_err() {
                self.download(remote, handle).await?;
            }
        }
        Ok(handles)
    }

    // Callers hold the lock of `handle.local_path`.
    async fn download<R: RemoteSource>(
        &self,
        remote: &R,
        handle: &ArchiveHandle,
    ) -> Result<(), ArchiveError> {
        let bytes = remote.fetch(&handle.remote_dir, &handle.remote_name).await?;
        write_atomic(&handle.local_path, bytes)
            .await
            .map_err(|e| ArchiveError::CacheWrite(handle.local_path.clone(), e))?;
        info!("Cached archive {:?}", handle.local_path);
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), ArchiveError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArchiveError::CacheDeletion(path.to_path_buf(), e)),
        }
    }

    async fn extract(&self, handle: &ArchiveHandle) -> Result<PathBuf, ArchiveError> {
        let archive = handle.local_path.clone();
        let target = handle.data_path();
        let result_path = target.clone();
        tokio::task::spawn_blocking(move || extract_data_member(&archive, &target)).await??;
        Ok(result_path)
    }

    /// Returns the extracted data file of `handle`, extracting it unless it is already cached.
    ///
    /// A corrupt archive is deleted and downloaded once more. If the fresh copy is corrupt as
    /// well it is deleted too and the error is returned.
    pub async fn materialize<R: RemoteSource>(
        &self,
        remote: &R,
        handle: &ArchiveHandle,
        force_refresh: bool,
    ) -> Result<PathBuf, ArchiveError> {
        let data_path = handle.data_path();
        let _guard = self.locks.lock(&handle.local_path).await;

        if !force_refresh && tokio::fs::metadata(&data_path).await.is_ok() {
            debug!("Cache hit for extracted {:?}", data_path);
            return Ok(data_path);
        }

        match self.extract(handle).await {
            Err(ArchiveError::CorruptArchive { path, source }) => {
                warn!(
                    "Archive {:?} is corrupt ({}). Deleting it and downloading again",
                    path, source
                );
                self.remove(&handle.local_path).await?;
                self.download(remote, handle).await?;
                match self.extract(handle).await {
                    Err(ArchiveError::CorruptArchive { path, source }) => {
                        warn!("Archive {:?} is still corrupt after downloading again", path);
                        self.remove(&handle.local_path).await?;
                        Err(ArchiveError::CorruptArchive { path, source })
                    }
                    other => other,
                }
            }
            other => other,
        }
    }
}
