use crate::archive::error::ArchiveError;
use crate::utils::write_atomic_blocking;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Data members are the only archive entries starting with this prefix; the rest is metadata.
pub const DATA_MEMBER_PREFIX: &str = "produkt_";

fn is_data_member(name: &str) -> bool {
    name.rsplit('/')
        .next()
        .is_some_and(|file| file.starts_with(DATA_MEMBER_PREFIX))
}

/// Extracts the data member of `archive_path` to `target`. Open and read failures of the zip
/// itself are reported as [`ArchiveError::CorruptArchive`]; `target` is only ever replaced
/// atomically, so a failed extraction leaves nothing behind.
pub fn extract_data_member(archive_path: &Path, target: &Path) -> Result<(), ArchiveError> {
    let corrupt = |source: ZipError| ArchiveError::CorruptArchive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path)
        .map_err(|e| ArchiveError::ExtractIo(archive_path.to_path_buf(), e))?;
    let mut archive = ZipArchive::new(file).map_err(corrupt)?;

    let member = archive
        .file_names()
        .find(|name| is_data_member(name))
        .map(str::to_string)
        .ok_or_else(|| ArchiveError::MissingDataMember(archive_path.to_path_buf()))?;

    let mut entry = archive.by_name(&member).map_err(corrupt)?;
    let mut content = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut content)
        .map_err(|e| corrupt(ZipError::Io(e)))?;

    write_atomic_blocking(target, &content)
        .map_err(|e| ArchiveError::ExtractIo(target.to_path_buf(), e))
}
