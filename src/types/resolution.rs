//! Defines the temporal resolutions and archive eras of DWD station observations.

use crate::naming::error::NamingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The time granularity of a station series.
///
/// Selects which naming table applies and determines the directory segment, the archive
/// filename prefix and the timestamp format of the remote data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resolution {
    /// One observation every ten minutes.
    TenMinutes,
    /// One observation per hour.
    Hourly,
    /// One observation (or aggregate) per day.
    Daily,
}

impl Resolution {
    /// Directory segment below the climate root (e.g. `hourly`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            Resolution::TenMinutes => "10_minutes",
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
        }
    }

    /// Deterministic prefix of every archive filename at this resolution.
    pub(crate) fn archive_prefix(&self) -> &'static str {
        match self {
            Resolution::TenMinutes => "10minutenwerte",
            Resolution::Hourly => "stundenwerte",
            Resolution::Daily => "tageswerte",
        }
    }

    pub(crate) fn description_tag(&self) -> &'static str {
        match self {
            Resolution::TenMinutes => "10min",
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
        }
    }

    pub(crate) fn roster_filename(&self, roster_code: &str) -> String {
        match self {
            Resolution::TenMinutes => format!(
                "zehn_min_{}_Beschreibung_Stationen.txt",
                roster_code.to_lowercase()
            ),
            Resolution::Hourly => format!("{}_Stundenwerte_Beschreibung_Stationen.txt", roster_code),
            Resolution::Daily => format!("{}_Tageswerte_Beschreibung_Stationen.txt", roster_code),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for Resolution {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10_minutes" | "10minutes" | "10min" => Ok(Resolution::TenMinutes),
            "hourly" => Ok(Resolution::Hourly),
            "daily" => Ok(Resolution::Daily),
            other => Err(NamingError::UnknownResolution(other.to_string())),
        }
    }
}

/// Remote partition of a family directory.
///
/// `Historical` holds closed, quality-controlled spans; `Recent` and `Now` are still updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Era {
    #[default]
    Historical,
    Recent,
    Now,
}

impl Era {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Era::Historical => "historical",
            Era::Recent => "recent",
            Era::Now => "now",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for Era {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "historical" => Ok(Era::Historical),
            "recent" => Ok(Era::Recent),
            "now" => Ok(Era::Now),
            other => Err(NamingError::UnknownEra(other.to_string())),
        }
    }
}
