//! The main entry point: a client that loads station rosters and assembled station series from
//! the DWD open data climate archive, caching everything it downloads.

use crate::archive::cache::ArchiveCache;
use crate::config::DwdConfig;
use crate::error::DwdError;
use crate::naming::resolver::{resolve, NamingScheme};
use crate::remote::http::HttpRemote;
use crate::remote::RemoteSource;
use crate::series::compose::{compose_collection, compose_station};
use crate::series::parser::parse;
use crate::series::stitch::{restrict, stitch};
use crate::stations::filtering::intersect_stations;
use crate::stations::roster_store::RosterStore;
use crate::types::period::DateBound;
use crate::types::resolution::{Era, Resolution};
use crate::types::series::{Collection, StationRecord, StationSeries};
use crate::types::station::Roster;
use crate::types::variable::{Variable, VariableSpec};
use crate::utils::{ensure_cache_dir_exists, write_atomic, PathLocks};
use bon::bon;
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

const DEFAULT_RESOLUTION: Resolution = Resolution::Hourly;
const DEFAULT_ERA: Era = Era::Historical;

fn unavailable_marker(description: &Path) -> PathBuf {
    description.with_extension("pdf.unavailable")
}

/// Start/end bounds and refresh flag shared by every series request.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: Option<DateBound>,
    end: Option<DateBound>,
    force_refresh: bool,
}

/// The client for the DWD climate observations.
///
/// Rosters, archives, extracted data files and description documents are cached below the
/// configured cache directory, one subdirectory per variable family. Nothing is downloaded again
/// unless a request sets `force_refresh`.
///
/// Create an instance with [`Dwd::new()`] for the defaults, [`Dwd::with_config()`] for a custom
/// [`DwdConfig`], or [`Dwd::with_remote()`] to read from another [`RemoteSource`].
///
/// # Examples
///
/// ```rust
/// # use dwd_opendata::{Dwd, DwdError, Resolution, Variable};
/// # async fn run() -> Result<(), DwdError> {
/// let client = Dwd::new().await?;
/// let series = client
///     .load_series()
///     .station("Konstanz")
///     .variable(Variable::AirTemperature)
///     .resolution(Resolution::Daily)
///     .call()
///     .await?;
/// println!("{} daily values", series.len());
/// # Ok(())
/// # }
/// ```
pub struct Dwd<R: RemoteSource = HttpRemote> {
    remote: R,
    config: DwdConfig,
    cache_dir: PathBuf,
    rosters: RosterStore,
    archives: ArchiveCache,
    description_locks: PathLocks,
}

impl Dwd<HttpRemote> {
    /// Creates a client with the default configuration, caching in the platform cache directory
    /// (e.g. `~/.cache/dwd_opendata_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`DwdError::CacheDirResolution`] if the platform cache directory is unknown and
    /// [`DwdError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, DwdError> {
        Self::with_config(DwdConfig::default()).await
    }

    /// Creates a client reading from the HTTPS mirror configured in `config`.
    pub async fn with_config(config: DwdConfig) -> Result<Self, DwdError> {
        let remote = HttpRemote::new(&config.base_url, config.request_timeout())?;
        Self::with_remote(config, remote).await
    }

    /// Creates a client with the default configuration and a specific cache directory.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, DwdError> {
        Self::with_config(DwdConfig::default().with_cache_dir(cache_folder)).await
    }
}

#[bon]
impl<R: RemoteSource> Dwd<R> {
    /// Creates a client on top of any [`RemoteSource`].
    pub async fn with_remote(config: DwdConfig, remote: R) -> Result<Self, DwdError> {
        let cache_dir = config
            .resolve_cache_dir()
            .map_err(DwdError::CacheDirResolution)?;
        ensure_cache_dir_exists(&cache_dir)
            .await
            .map_err(|e| DwdError::CacheDirCreation(cache_dir.clone(), e))?;
        Ok(Self {
            rosters: RosterStore::new(&cache_dir, config.roster_columns),
            archives: ArchiveCache::new(&cache_dir),
            description_locks: PathLocks::default(),
            remote,
            config,
            cache_dir,
        })
    }

    pub fn config(&self) -> &DwdConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Resolves remote and cache names for a variable request.
    pub fn scheme(&self, spec: VariableSpec) -> Result<NamingScheme, DwdError> {
        Ok(resolve(spec, &self.config.climate_root)?)
    }

    /// Loads the station roster of a variable's family.
    ///
    /// # Arguments
    ///
    /// * `.variable(Variable)`: **Required.** Any variable of the family.
    /// * `.resolution(Resolution)`: Optional. Defaults to hourly.
    /// * `.era(Era)`: Optional. Defaults to historical. Ignored for families without eras.
    /// * `.force_refresh(bool)`: Optional. Download the roster even if it is cached.
    ///
    /// # Errors
    ///
    /// Returns [`DwdError::Naming`] for a variable not offered at the resolution and
    /// [`DwdError::Roster`] if the roster cannot be downloaded or cached.
    #[builder]
    pub async fn load_roster(
        &self,
        variable: Variable,
        resolution: Option<Resolution>,
        era: Option<Era>,
        force_refresh: Option<bool>,
    ) -> Result<Roster, DwdError> {
        let spec = VariableSpec::new(
            variable,
            resolution.unwrap_or(DEFAULT_RESOLUTION),
            Some(era.unwrap_or(DEFAULT_ERA)),
        );
        self.roster_for(spec, force_refresh.unwrap_or(false)).await
    }

    /// Loads the roster of the first variable, restricted to the stations that appear in the
    /// rosters of all `variables`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dwd_opendata::{Dwd, DwdError, Variable};
    /// # async fn run() -> Result<(), DwdError> {
    /// let client = Dwd::new().await?;
    /// let both = client
    ///     .common_roster()
    ///     .variables(&[Variable::AirTemperature, Variable::Precipitation])
    ///     .call()
    ///     .await?;
    /// println!("{} stations measure temperature and precipitation", both.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn common_roster(
        &self,
        variables: &[Variable],
        resolution: Option<Resolution>,
        era: Option<Era>,
        force_refresh: Option<bool>,
    ) -> Result<Roster, DwdError> {
        let resolution = resolution.unwrap_or(DEFAULT_RESOLUTION);
        let era = era.unwrap_or(DEFAULT_ERA);
        let mut rosters = Vec::with_capacity(variables.len());
        for variable in variables {
            let spec = VariableSpec::new(*variable, resolution, Some(era));
            rosters.push(
                self.roster_for(spec, force_refresh.unwrap_or(false))
                    .await?,
            );
        }
        let common = intersect_stations(&rosters);
        Ok(match rosters.first() {
            Some(first) => first.restrict_to(&common),
            None => Roster::new("", resolution, Vec::new()),
        })
    }

    /// Loads the assembled series of one variable at one station.
    ///
    /// The archives of the station are stitched in chronological order, overlaps resolved in
    /// favour of the earlier archive, and the result is restricted to `start..=end`.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: **Required.** The station name as written in the roster.
    /// * `.variable(Variable)`: **Required.**
    /// * `.resolution(Resolution)`: Optional. Defaults to hourly.
    /// * `.era(Era)`: Optional. Defaults to historical.
    /// * `.start(DateBound)` / `.end(DateBound)`: Optional. Inclusive period bounds; a year or
    ///   month bound covers the whole period.
    /// * `.force_refresh(bool)`: Optional. Download roster and archives again and re-extract.
    ///
    /// # Returns
    ///
    /// An empty series (with a warning) if the station is not in the variable's roster.
    ///
    /// # Errors
    ///
    /// [`DwdError::is_not_found()`] is true if the remote has no archive for the station, and
    /// [`DwdError::is_corrupt_archive()`] if an archive stays corrupt after downloading it again.
    #[builder]
    pub async fn load_series(
        &self,
        station: &str,
        variable: Variable,
        resolution: Option<Resolution>,
        era: Option<Era>,
        start: Option<DateBound>,
        end: Option<DateBound>,
        force_refresh: Option<bool>,
    ) -> Result<StationSeries, DwdError> {
        let spec = VariableSpec::new(
            variable,
            resolution.unwrap_or(DEFAULT_RESOLUTION),
            Some(era.unwrap_or(DEFAULT_ERA)),
        );
        let window = Window {
            start,
            end,
            force_refresh: force_refresh.unwrap_or(false),
        };
        self.assemble_series(station, spec, window).await
    }

    /// Loads several variables of one station, aligned on the union of their timestamps.
    ///
    /// Takes the same arguments as [`Dwd::load_series`], with `.variables(&[Variable])` instead of
    /// `.variable(..)`. Returns `None` (with a warning) if the station has no data for any of them.
    #[builder]
    pub async fn load_station(
        &self,
        station: &str,
        variables: &[Variable],
        resolution: Option<Resolution>,
        era: Option<Era>,
        start: Option<DateBound>,
        end: Option<DateBound>,
        force_refresh: Option<bool>,
    ) -> Result<Option<StationRecord>, DwdError> {
        let window = Window {
            start,
            end,
            force_refresh: force_refresh.unwrap_or(false),
        };
        self.assemble_station(
            station,
            variables,
            resolution.unwrap_or(DEFAULT_RESOLUTION),
            era.unwrap_or(DEFAULT_ERA),
            window,
        )
        .await
    }

    /// Loads several variables for several stations.
    ///
    /// Stations are loaded `concurrency` at a time (see [`DwdConfig`]) and the collection keeps
    /// the order of `stations`. Stations without any data are left out with a warning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dwd_opendata::{DateBound, Dwd, Resolution, Variable};
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Dwd::new().await?;
    /// let collection = client
    ///     .load_collection()
    ///     .stations(&["Konstanz", "Freiburg"])
    ///     .variables(&[Variable::AirTemperature, Variable::Precipitation])
    ///     .resolution(Resolution::Daily)
    ///     .start("2010".parse::<DateBound>()?)
    ///     .end("2015".parse::<DateBound>()?)
    ///     .call()
    ///     .await?;
    /// let frame = collection.to_dataframe()?;
    /// println!("{frame}");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn load_collection(
        &self,
        stations: &[&str],
        variables: &[Variable],
        resolution: Option<Resolution>,
        era: Option<Era>,
        start: Option<DateBound>,
        end: Option<DateBound>,
        force_refresh: Option<bool>,
    ) -> Result<Collection, DwdError> {
        let resolution = resolution.unwrap_or(DEFAULT_RESOLUTION);
        let era = era.unwrap_or(DEFAULT_ERA);
        let window = Window {
            start,
            end,
            force_refresh: force_refresh.unwrap_or(false),
        };

        let loads = stations
            .iter()
            .map(|station| self.assemble_station(station, variables, resolution, era, window));
        let results: Vec<Result<Option<StationRecord>, DwdError>> = stream::iter(loads)
            .buffered(self.config.effective_concurrency())
            .collect()
            .await;

        let records = results
            .into_iter()
            .collect::<Result<Vec<Option<StationRecord>>, DwdError>>()?;
        Ok(compose_collection(records.into_iter().flatten()))
    }

    /// Downloads the description document of a variable's family unless it is cached, and
    /// returns its local path.
    #[builder]
    pub async fn description(
        &self,
        variable: Variable,
        resolution: Option<Resolution>,
    ) -> Result<PathBuf, DwdError> {
        let spec = VariableSpec::new(variable, resolution.unwrap_or(DEFAULT_RESOLUTION), None);
        let scheme = self.scheme(spec)?;
        self.ensure_description(&scheme).await
    }

    fn description_path(&self, scheme: &NamingScheme) -> PathBuf {
        self.cache_dir
            .join(scheme.family_name())
            .join(scheme.description_filename())
    }

    async fn ensure_description(&self, scheme: &NamingScheme) -> Result<PathBuf, DwdError> {
        let path = self.description_path(scheme);
        let _guard = self.description_locks.lock(&path).await;
        if tokio::fs::metadata(&path).await.is_ok() {
            return Ok(path);
        }
        let bytes = self
            .remote
            .fetch(&scheme.description_directory, &scheme.description_filename())
            .await?;
        write_atomic(&path, bytes)
            .await
            .map_err(|e| DwdError::CacheWrite(path.clone(), e))?;
        let marker = unavailable_marker(&path);
        if tokio::fs::metadata(&marker).await.is_ok() {
            tokio::fs::remove_file(&marker)
                .await
                .map_err(|e| DwdError::CacheWrite(marker, e))?;
        }
        info!("Cached description {:?}", path);
        Ok(path)
    }

    /// Fetches the description ahead of a series load. A failure leaves a marker in the cache,
    /// and marked descriptions are only tried again on a forced refresh.
    async fn prefetch_description(&self, scheme: &NamingScheme, force_refresh: bool) {
        let marker = unavailable_marker(&self.description_path(scheme));
        if !force_refresh && tokio::fs::metadata(&marker).await.is_ok() {
            debug!("Skipping unavailable {}", scheme.description_filename());
            return;
        }
        if let Err(e) = self.ensure_description(scheme).await {
            warn!(
                "Could not fetch {}: {}",
                scheme.description_filename(),
                e
            );
            if let Err(e) = write_atomic(&marker, Vec::new()).await {
                warn!("Could not write {:?}: {}", marker, e);
            }
        }
    }

    async fn roster_for(
        &self,
        spec: VariableSpec,
        force_refresh: bool,
    ) -> Result<Roster, DwdError> {
        let scheme = self.scheme(spec)?;
        Ok(self
            .rosters
            .load(&self.remote, &scheme, force_refresh)
            .await?)
    }

    async fn assemble_series(
        &self,
        station: &str,
        spec: VariableSpec,
        window: Window,
    ) -> Result<StationSeries, DwdError> {
        let scheme = self.scheme(spec)?;
        if self.config.download_descriptions {
            self.prefetch_description(&scheme, window.force_refresh)
                .await;
        }

        let roster = self
            .rosters
            .load(&self.remote, &scheme, window.force_refresh)
            .await?;
        let Some(metadata) = roster.find_by_name(station) else {
            warn!(
                "No {} {} data for station {}",
                scheme.resolution, spec.variable, station
            );
            return Ok(StationSeries::empty(station, scheme.result_columns()));
        };

        let handles = self
            .archives
            .ensure_archives(&self.remote, &scheme, metadata.id, window.force_refresh)
            .await?;
        let mut tables = Vec::with_capacity(handles.len());
        for handle in &handles {
            let path = self
                .archives
                .materialize(&self.remote, handle, window.force_refresh)
                .await?;
            tables.push(parse(&path, station, &scheme).await?);
        }

        let series = restrict(stitch(tables), window.start, window.end);
        info!(
            "Loaded {} {} rows of {} for station {}",
            series.len(),
            scheme.resolution,
            spec.variable,
            station
        );
        Ok(series)
    }

    async fn assemble_station(
        &self,
        station: &str,
        variables: &[Variable],
        resolution: Resolution,
        era: Era,
        window: Window,
    ) -> Result<Option<StationRecord>, DwdError> {
        let mut series = Vec::with_capacity(variables.len());
        for variable in variables {
            let spec = VariableSpec::new(*variable, resolution, Some(era));
            series.push(self.assemble_series(station, spec, window).await?);
        }
        Ok(compose_station(station, series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::resolver::DEFAULT_CLIMATE_ROOT;
    use crate::testing::{daily_kl_data, date, roster_bytes, station, station_zip, FakeRemote};
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    const HIST: &str = "tageswerte_KL_00100_19500101_20151231_hist.zip";
    const AKT: &str = "tageswerte_KL_00100_akt.zip";

    fn kl_scheme() -> NamingScheme {
        resolve(
            VariableSpec::new(Variable::AirTemperature, Resolution::Daily, Some(Era::Historical)),
            DEFAULT_CLIMATE_ROOT,
        )
        .unwrap()
    }

    fn hourly_scheme(variable: Variable) -> NamingScheme {
        resolve(
            VariableSpec::new(variable, Resolution::Hourly, Some(Era::Historical)),
            DEFAULT_CLIMATE_ROOT,
        )
        .unwrap()
    }

    fn konstanz_roster() -> Vec<u8> {
        roster_bytes(&[station(100, "Konstanz", "19500101", "20201231")])
    }

    fn historical_archive() -> Vec<u8> {
        station_zip(
            "tageswerte_KL_00100",
            &daily_kl_data(100, date("19500101"), date("20151231"), 1.0),
        )
    }

    fn recent_archive() -> Vec<u8> {
        station_zip(
            "tageswerte_KL_00100",
            &daily_kl_data(100, date("20151230"), date("20201231"), 2.0),
        )
    }

    /// The two-archive Konstanz layout: a historical span and an overlapping current span.
    fn konstanz_remote() -> FakeRemote {
        let scheme = kl_scheme();
        FakeRemote::new()
            .with_file(&scheme.directory, &scheme.roster_filename(), konstanz_roster())
            .with_file(&scheme.directory, HIST, historical_archive())
            .with_file(&scheme.directory, AKT, recent_archive())
    }

    fn config(dir: &TempDir) -> DwdConfig {
        DwdConfig {
            download_descriptions: false,
            ..DwdConfig::default().with_cache_dir(dir.path())
        }
    }

    fn midnight(raw: &str) -> NaiveDateTime {
        date(raw).and_hms_opt(0, 0, 0).unwrap()
    }

    async fn konstanz_series(client: &Dwd<FakeRemote>) -> Result<StationSeries, DwdError> {
        client
            .load_series()
            .station("Konstanz")
            .variable(Variable::AirTemperature)
            .resolution(Resolution::Daily)
            .call()
            .await
    }

    #[tokio::test]
    async fn historical_and_recent_archives_stitch_without_duplicates() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let client = Dwd::with_remote(config(&dir), konstanz_remote()).await?;
        let series = konstanz_series(&client).await?;

        assert_eq!(series.columns, vec!["air_temperature"]);
        assert_eq!(series.first_time(), Some(midnight("19500101")));
        assert_eq!(series.last_time(), Some(midnight("20201231")));
        assert!(series.rows.windows(2).all(|w| w[0].time < w[1].time));
        let days = (midnight("20201231") - midnight("19500101")).num_days() + 1;
        assert_eq!(series.len() as i64, days);

        let at = |raw: &str| {
            series
                .rows
                .iter()
                .find(|r| r.time == midnight(raw))
                .map(|r| r.values.clone())
        };
        assert_eq!(at("20151231"), Some(vec![Some(1.0)]));
        assert_eq!(at("20160101"), Some(vec![Some(2.0)]));
        Ok(())
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let first = {
            let client = Dwd::with_remote(config(&dir), konstanz_remote()).await?;
            konstanz_series(&client).await?
        };

        // A new client starts without in-memory state, like a new process.
        let client = Dwd::with_remote(config(&dir), konstanz_remote()).await?;
        let second = konstanz_series(&client).await?;
        assert_eq!(client.remote().network_calls(), 0);
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn absent_station_yields_empty_series() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let client = Dwd::with_remote(config(&dir), konstanz_remote()).await?;
        let series = client
            .load_series()
            .station("Zugspitze")
            .variable(Variable::AirTemperatureMax)
            .resolution(Resolution::Daily)
            .call()
            .await?;
        assert!(series.is_empty());
        assert_eq!(series.columns, vec!["air_temperature_max"]);
        assert_eq!(client.remote().list_calls(), 0);

        let record = client
            .load_station()
            .station("Zugspitze")
            .variables(&[Variable::AirTemperature, Variable::Precipitation])
            .resolution(Resolution::Daily)
            .call()
            .await?;
        assert!(record.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_archive_recovers_once() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let scheme = kl_scheme();
        let remote = FakeRemote::new()
            .with_file(&scheme.directory, &scheme.roster_filename(), konstanz_roster())
            .with_payloads(
                &scheme.directory,
                HIST,
                vec![b"PK truncated".to_vec(), historical_archive()],
            )
            .with_file(&scheme.directory, AKT, recent_archive());
        let client = Dwd::with_remote(config(&dir), remote).await?;
        let series = konstanz_series(&client).await?;
        assert_eq!(series.first_time(), Some(midnight("19500101")));
        assert_eq!(client.remote().fetches_of(HIST), 2);
        Ok(())
    }

    #[tokio::test]
    async fn persistently_corrupt_archive_is_an_error() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let scheme = kl_scheme();
        let remote = FakeRemote::new()
            .with_file(&scheme.directory, &scheme.roster_filename(), konstanz_roster())
            .with_file(&scheme.directory, HIST, b"PK truncated".to_vec());
        let client = Dwd::with_remote(config(&dir), remote).await?;
        let err = konstanz_series(&client).await.unwrap_err();
        assert!(err.is_corrupt_archive());
        assert_eq!(client.remote().fetches_of(HIST), 2);
        Ok(())
    }

    #[tokio::test]
    async fn missing_archives_are_not_found() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let scheme = kl_scheme();
        let remote = FakeRemote::new().with_file(
            &scheme.directory,
            &scheme.roster_filename(),
            konstanz_roster(),
        );
        let client = Dwd::with_remote(config(&dir), remote).await?;
        let err = konstanz_series(&client).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_fetch_error());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_roster_is_a_fetch_error() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let client = Dwd::with_remote(config(&dir), FakeRemote::new()).await?;
        let err = konstanz_series(&client).await.unwrap_err();
        assert!(err.is_fetch_error());
        Ok(())
    }

    #[tokio::test]
    async fn collection_keeps_order_and_drops_stations_without_data() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let scheme = kl_scheme();
        let roster = roster_bytes(&[
            station(100, "Konstanz", "19500101", "20201231"),
            station(200, "Freiburg", "19500101", "20201231"),
        ]);
        let remote = FakeRemote::new()
            .with_file(&scheme.directory, &scheme.roster_filename(), roster)
            .with_file(&scheme.directory, AKT, recent_archive())
            .with_file(
                &scheme.directory,
                "tageswerte_KL_00200_akt.zip",
                station_zip(
                    "tageswerte_KL_00200",
                    &daily_kl_data(200, date("20200101"), date("20201231"), 3.0),
                ),
            );
        let client = Dwd::with_remote(
            DwdConfig {
                concurrency: 2,
                ..config(&dir)
            },
            remote,
        )
        .await?;

        let collection = client
            .load_collection()
            .stations(&["Freiburg", "Atlantis", "Konstanz"])
            .variables(&[Variable::AirTemperature, Variable::Precipitation])
            .resolution(Resolution::Daily)
            .start("2020".parse().unwrap())
            .end("2020-06".parse().unwrap())
            .call()
            .await?;

        assert_eq!(collection.station_names(), vec!["Freiburg", "Konstanz"]);
        let konstanz = collection.get("Konstanz").unwrap();
        assert_eq!(konstanz.columns, vec!["air_temperature", "precipitation"]);
        assert_eq!(konstanz.time.first(), Some(&midnight("20200101")));
        assert_eq!(konstanz.time.last(), Some(&midnight("20200630")));
        assert_eq!(konstanz.column("precipitation").unwrap()[0], Some(0.0));

        let frame = collection.to_dataframe().unwrap();
        assert_eq!(frame.height(), 2 * 182);
        Ok(())
    }

    #[tokio::test]
    async fn common_roster_keeps_shared_stations() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let air = hourly_scheme(Variable::AirTemperature);
        let rain = hourly_scheme(Variable::Precipitation);
        let remote = FakeRemote::new()
            .with_file(
                &air.directory,
                &air.roster_filename(),
                roster_bytes(&[
                    station(1, "Konstanz", "19500101", "20201231"),
                    station(2, "Freiburg", "19500101", "20201231"),
                ]),
            )
            .with_file(
                &rain.directory,
                &rain.roster_filename(),
                roster_bytes(&[
                    station(2, "Freiburg", "19500101", "20201231"),
                    station(3, "Hamburg", "19500101", "20201231"),
                ]),
            );
        let client = Dwd::with_remote(config(&dir), remote).await?;
        let common = client
            .common_roster()
            .variables(&[Variable::AirTemperature, Variable::Precipitation])
            .call()
            .await?;
        assert_eq!(common.len(), 1);
        assert_eq!(common.stations[0].name, "Freiburg");
        assert_eq!(common.family, "air_temperature");

        let roster = client
            .load_roster()
            .variable(Variable::RelativeHumidity)
            .call()
            .await?;
        assert_eq!(roster.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn descriptions_are_cached_and_optional() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let scheme = kl_scheme();
        let pdf = scheme.description_filename();
        let remote = konstanz_remote().with_file(
            &scheme.description_directory,
            &pdf,
            b"%PDF-1.4".to_vec(),
        );
        let client = Dwd::with_remote(
            DwdConfig {
                download_descriptions: true,
                ..config(&dir)
            },
            remote,
        )
        .await?;
        konstanz_series(&client).await?;
        let cached = dir.path().join("kl").join(&pdf);
        assert_eq!(std::fs::read(&cached).unwrap(), b"%PDF-1.4");

        let path = client
            .description()
            .variable(Variable::Precipitation)
            .resolution(Resolution::Daily)
            .call()
            .await?;
        assert_eq!(path, cached);
        assert_eq!(client.remote().fetches_of(&pdf), 1);

        // Without a description on the remote, loading still succeeds.
        let other_dir = tempfile::tempdir().unwrap();
        let client = Dwd::with_remote(
            DwdConfig {
                download_descriptions: true,
                ..config(&other_dir)
            },
            konstanz_remote(),
        )
        .await?;
        assert!(!konstanz_series(&client).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_description_is_not_retried_on_cached_runs() -> Result<(), DwdError> {
        let dir = tempfile::tempdir().unwrap();
        let defaults = || DwdConfig::default().with_cache_dir(dir.path());
        {
            let client = Dwd::with_remote(defaults(), konstanz_remote()).await?;
            konstanz_series(&client).await?;
        }

        let client = Dwd::with_remote(defaults(), konstanz_remote()).await?;
        let second = konstanz_series(&client).await?;
        assert!(!second.is_empty());
        assert_eq!(client.remote().network_calls(), 0);

        // An explicit request, or a forced refresh, asks the remote again.
        assert!(client
            .description()
            .variable(Variable::AirTemperature)
            .resolution(Resolution::Daily)
            .call()
            .await
            .unwrap_err()
            .is_fetch_error());
        let pdf = kl_scheme().description_filename();
        assert_eq!(client.remote().fetches_of(&pdf), 1);
        client
            .load_series()
            .station("Konstanz")
            .variable(Variable::AirTemperature)
            .resolution(Resolution::Daily)
            .force_refresh(true)
            .call()
            .await?;
        assert_eq!(client.remote().fetches_of(&pdf), 2);
        Ok(())
    }
}
