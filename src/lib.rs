mod archive;
mod config;
mod dwd;
mod error;
mod naming;
mod remote;
mod series;
mod stations;
mod types;
mod utils;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, DwdConfig, DEFAULT_BASE_URL};
pub use dwd::Dwd;
pub use error::DwdError;

pub use archive::error::ArchiveError;
pub use naming::error::NamingError;
pub use remote::error::FetchError;
pub use series::error::SeriesError;
pub use stations::error::RosterError;

pub use naming::resolver::{
    resolve, resolve_archive_stem, resolve_description_filename, resolve_directory,
    resolve_directory_by_name, resolve_metadata_filename, NamingScheme, DEFAULT_CLIMATE_ROOT,
};
pub use naming::table::{DataColumn, Family, TimestampFormat};

pub use remote::http::{parse_listing, HttpRemote};
pub use remote::RemoteSource;

pub use stations::filtering::{filter, intersect_stations};
pub use stations::roster_store::{parse_roster, ColumnSpans, DEFAULT_ROSTER_COLUMNS};

pub use series::compose::{compose_collection, compose_station};
pub use series::parser::{parse, parse_text};
pub use series::stitch::{restrict, stitch};

pub use types::period::{DateBound, Month, ParseDateBoundError, Year};
pub use types::resolution::{Era, Resolution};
pub use types::series::{Collection, Observation, StationRecord, StationSeries};
pub use types::station::{BoundingBox, CoverageWindow, LatLon, Roster, StationMetadata};
pub use types::variable::{Variable, VariableSpec};

pub use utils::get_cache_dir;
