use log::info;
use std::collections::HashMap;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

const CACHE_DIR_NAME: &str = "dwd_opendata_cache";

/// Prefix of in-flight temporary files. Cache globs never match it.
pub(crate) const TEMP_PREFIX: &str = ".tmp";

pub fn get_cache_dir() -> Result<PathBuf, io::Error> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> Result<(), io::Error> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Cache path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}

/// Writes `bytes` next to `path` under a temporary name and renames it into place, so readers
/// never observe a partially written cache file.
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<(), io::Error> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &bytes))
        .await
        .map_err(io::Error::other)?
}

pub(crate) fn write_atomic_blocking(path: &Path, bytes: &[u8]) -> Result<(), io::Error> {
    let mut temp = temp_file_beside(path)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn temp_file_beside(path: &Path) -> Result<tempfile::NamedTempFile, io::Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
}

/// The remote text files are ISO-8859-1; every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// One async mutex per cache path. Every mutation of a cache file (download, extraction,
/// corrupt-archive deletion) holds the lock of that file.
#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    pub(crate) async fn lock(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(path.to_path_buf()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_decodes_umlauts() {
        let bytes = b"Baden-W\xfcrttemberg";
        assert_eq!(decode_latin1(bytes), "Baden-Württemberg");
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_files() -> Result<(), io::Error> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("family").join("data.txt");
        write_atomic(&target, b"first".to_vec()).await?;
        write_atomic(&target, b"second".to_vec()).await?;
        assert_eq!(tokio::fs::read(&target).await?, b"second");

        let names: Vec<_> = std::fs::read_dir(dir.path().join("family"))?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn ensure_cache_dir_rejects_files() -> Result<(), io::Error> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, b"x")?;
        assert!(ensure_cache_dir_exists(&file).await.is_err());
        let nested = dir.path().join("a").join("b");
        ensure_cache_dir_exists(&nested).await?;
        assert!(nested.is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn path_locks_serialize_same_path() {
        let locks = PathLocks::default();
        let path = Path::new("/tmp/x.zip");
        let guard = locks.lock(path).await;
        let other = Path::new("/tmp/y.zip");
        // A different path is not blocked.
        let _other_guard = locks.lock(other).await;
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), locks.lock(path));
        assert!(pending.await.is_err());
        drop(guard);
        let _again = locks.lock(path).await;
    }
}
