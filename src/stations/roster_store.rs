//! Downloading, caching and parsing of the fixed-width station rosters.
//!
//! Each (family, resolution) roster is downloaded once, decoded from latin-1 and stored verbatim as
//! `{cache_dir}/{family}/metadata_{family}_{resolution}.txt`. Later loads parse the cached text, and
//! parsed rosters are additionally memoized for the lifetime of the store.

use crate::naming::resolver::NamingScheme;
use crate::remote::RemoteSource;
use crate::stations::error::RosterError;
use crate::types::resolution::Resolution;
use crate::types::station::{Roster, StationMetadata};
use crate::utils::{decode_latin1, write_atomic, PathLocks};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::{hash_map::Entry, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Character spans `[start, end)` of the roster columns: id, coverage start, coverage end,
/// elevation, latitude, longitude, name, region.
pub type ColumnSpans = [(usize, usize); 8];

pub const DEFAULT_ROSTER_COLUMNS: ColumnSpans = [
    (0, 5),
    (6, 14),
    (15, 23),
    (23, 38),
    (38, 50),
    (50, 60),
    (61, 102),
    (102, 200),
];

const HEADER_LINES: usize = 2;

fn field(chars: &[char], (start, end): (usize, usize)) -> String {
    let start = start.min(chars.len());
    let end = end.min(chars.len()).max(start);
    chars[start..end].iter().collect::<String>().trim().to_string()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

// Newer roster files append an extra column after the region, separated by a wide gap.
fn strip_trailing_column(region: &str) -> String {
    match region.find("  ") {
        Some(index) => region[..index].to_string(),
        None => region.to_string(),
    }
}

fn parse_line(line: &str, spans: &ColumnSpans) -> Option<StationMetadata> {
    let chars: Vec<char> = line.chars().collect();
    let [id, start, end, elevation, latitude, longitude, name, region] =
        spans.map(|span| field(&chars, span));
    Some(StationMetadata {
        id: id.parse().ok()?,
        start: parse_date(&start)?,
        end: parse_date(&end)?,
        elevation: elevation.parse().ok()?,
        latitude: latitude.parse().ok()?,
        longitude: longitude.parse().ok()?,
        name,
        region: strip_trailing_column(&region),
    })
}

/// Parses decoded roster text. The two header lines and blank lines are skipped; rows that do
/// not fit the column spans are logged and skipped.
pub fn parse_roster(text: &str, spans: &ColumnSpans) -> Vec<StationMetadata> {
    let mut stations = Vec::new();
    for (index, line) in text.lines().enumerate().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, spans) {
            Some(station) => stations.push(station),
            None => warn!("Skipping malformed roster line {}: {:?}", index + 1, line),
        }
    }
    stations
}

pub struct RosterStore {
    cache_dir: PathBuf,
    columns: ColumnSpans,
    rosters: Mutex<HashMap<(&'static str, Resolution), Roster>>,
    locks: PathLocks,
}

impl RosterStore {
    pub fn new(cache_dir: &Path, columns: ColumnSpans) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            columns,
            rosters: Mutex::new(HashMap::new()),
            locks: PathLocks::default(),
        }
    }

    pub fn cache_path(&self, scheme: &NamingScheme) -> PathBuf {
        self.cache_dir
            .join(scheme.family_name())
            .join(scheme.roster_cache_filename())
    }

    /// Returns the roster of the scheme's family, from memory, from the cache file, or
    /// downloaded, in that order. `force_refresh` always downloads.
    pub async fn load<R: RemoteSource>(
        &self,
        remote: &R,
        scheme: &NamingScheme,
        force_refresh: bool,
    ) -> Result<Roster, RosterError> {
        let key = (scheme.family_name(), scheme.resolution);

        if !force_refresh {
            let rosters = self.rosters.lock().await;
            if let Some(roster) = rosters.get(&key) {
                debug!("Roster {} {} served from memory", key.0, key.1);
                return Ok(roster.clone());
            }
        }

        let path = self.cache_path(scheme);
        let text = {
            let _guard = self.locks.lock(&path).await;
            if !force_refresh && tokio::fs::metadata(&path).await.is_ok() {
                info!("Cache hit for roster {:?}", path);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| RosterError::CacheRead(path.clone(), e))?
            } else {
                self.download(remote, scheme, &path).await?
            }
        };

        let columns = self.columns;
        let stations = tokio::task::spawn_blocking(move || parse_roster(&text, &columns)).await?;
        let roster = Roster::new(scheme.family_name(), scheme.resolution, stations);
        info!(
            "Loaded roster {} {} with {} stations",
            key.0,
            key.1,
            roster.len()
        );

        let mut rosters = self.rosters.lock().await;
        match rosters.entry(key) {
            Entry::Occupied(mut entry) if force_refresh => {
                entry.insert(roster.clone());
                Ok(roster)
            }
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(roster.clone());
                Ok(roster)
            }
        }
    }

    async fn download<R: RemoteSource>(
        &self,
        remote: &R,
        scheme: &NamingScheme,
        path: &Path,
    ) -> Result<String, RosterError> {
        warn!(
            "Cache miss for roster {} {}. Downloading {}",
            scheme.family_name(),
            scheme.resolution,
            scheme.roster_filename()
        );
        let bytes = remote
            .fetch(&scheme.directory, &scheme.roster_filename())
            .await?;
        let text = decode_latin1(&bytes);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RosterError::CacheDirCreation(parent.to_path_buf(), e))?;
        }
        write_atomic(path, text.clone().into_bytes())
            .await
            .map_err(|e| RosterError::CacheWrite(path.to_path_buf(), e))?;
        Ok(text)
    }
}
