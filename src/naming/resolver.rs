use crate::naming::error::NamingError;
use crate::naming::table::{lookup, DataColumn, Family, NamingRow, TimestampFormat};
use crate::types::resolution::{Era, Resolution};
use crate::types::variable::{Variable, VariableSpec};

/// Climate observation root below the remote base URL.
pub const DEFAULT_CLIMATE_ROOT: &str = "climate_environment/CDC/observations_germany/climate";

/// Everything needed to locate the remote and cached artifacts of one variable request.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    pub variable: Variable,
    pub resolution: Resolution,
    /// The era segment actually used; `None` for families without eras or requests without one.
    pub era: Option<Era>,
    row: &'static NamingRow,
    /// Remote directory of the archives and roster, relative to the base URL.
    pub directory: String,
    /// Remote directory of the description document (the family directory, never an era).
    pub description_directory: String,
}

impl NamingScheme {
    pub fn family(&self) -> &'static Family {
        self.row.family
    }

    /// Local cache subdirectory, one per family.
    pub fn family_name(&self) -> &'static str {
        self.row.family.name
    }

    pub fn columns(&self) -> &'static [DataColumn] {
        self.row.columns
    }

    pub fn result_columns(&self) -> Vec<String> {
        self.row
            .columns
            .iter()
            .map(|c| c.result.to_string())
            .collect()
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.row.family.timestamp
    }

    pub fn archive_stem(&self, station_id: u32) -> String {
        archive_stem(self.resolution, self.row.family, station_id)
    }

    pub fn roster_filename(&self) -> String {
        self.resolution.roster_filename(self.row.family.roster_code)
    }

    pub fn description_filename(&self) -> String {
        description_filename(self.resolution, self.row.family)
    }

    /// Name of the cached, decoded roster text.
    pub fn roster_cache_filename(&self) -> String {
        format!(
            "metadata_{}_{}.txt",
            self.row.family.name,
            self.resolution.path_segment()
        )
    }
}

fn row_for(variable: Variable, resolution: Resolution) -> Result<&'static NamingRow, NamingError> {
    lookup(variable, resolution).ok_or(NamingError::UnknownVariable {
        variable,
        resolution,
    })
}

fn family_directory(climate_root: &str, resolution: Resolution, family: &Family) -> String {
    format!(
        "{}/{}/{}",
        climate_root.trim_end_matches('/'),
        resolution.path_segment(),
        family.name
    )
}

fn effective_era(family: &Family, era: Option<Era>) -> Option<Era> {
    if family.omits_era {
        None
    } else {
        era
    }
}

fn archive_stem(resolution: Resolution, family: &Family, station_id: u32) -> String {
    format!(
        "{}_{}_{:05}",
        resolution.archive_prefix(),
        family.short_code,
        station_id
    )
}

fn description_filename(resolution: Resolution, family: &Family) -> String {
    format!(
        "DESCRIPTION_obsgermany_climate_{}_{}_en.pdf",
        resolution.description_tag(),
        family.name
    )
}

pub fn resolve(spec: VariableSpec, climate_root: &str) -> Result<NamingScheme, NamingError> {
    let row = row_for(spec.variable, spec.resolution)?;
    let era = effective_era(row.family, spec.era);
    let description_directory = family_directory(climate_root, spec.resolution, row.family);
    let directory = match era {
        Some(era) => format!("{}/{}", description_directory, era.path_segment()),
        None => description_directory.clone(),
    };
    Ok(NamingScheme {
        variable: spec.variable,
        resolution: spec.resolution,
        era,
        row,
        directory,
        description_directory,
    })
}

/// `{root}/{resolution}/{family}/{era?}`
pub fn resolve_directory(
    climate_root: &str,
    variable: Variable,
    resolution: Resolution,
    era: Option<Era>,
) -> Result<String, NamingError> {
    resolve(VariableSpec::new(variable, resolution, era), climate_root).map(|s| s.directory)
}

/// The deterministic prefix of a station's archive names. The remainder of the name (coverage
/// dates, `hist`/`akt`) is only known from a directory listing.
pub fn resolve_archive_stem(
    variable: Variable,
    resolution: Resolution,
    station_id: u32,
) -> Result<String, NamingError> {
    let row = row_for(variable, resolution)?;
    Ok(archive_stem(resolution, row.family, station_id))
}

pub fn resolve_metadata_filename(
    variable: Variable,
    resolution: Resolution,
) -> Result<String, NamingError> {
    let row = row_for(variable, resolution)?;
    Ok(resolution.roster_filename(row.family.roster_code))
}

pub fn resolve_description_filename(
    variable: Variable,
    resolution: Resolution,
) -> Result<String, NamingError> {
    let row = row_for(variable, resolution)?;
    Ok(description_filename(resolution, row.family))
}

/// Same as [`resolve_directory`], but from string names as a caller would type them.
pub fn resolve_directory_by_name(
    climate_root: &str,
    variable: &str,
    resolution: &str,
    era: Option<&str>,
) -> Result<String, NamingError> {
    let era = era.map(str::parse::<Era>).transpose()?;
    resolve_directory(climate_root, variable.parse()?, resolution.parse()?, era)
}
