//! Logical variable names a caller can request.

use crate::naming::error::NamingError;
use crate::types::resolution::{Era, Resolution};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical meteorological variable.
///
/// Several variables share one remote family (all `Wind*` variables live in the `wind` archives,
/// relative humidity lives in the air temperature archives). The mapping is kept in the naming
/// table, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    AirTemperature,
    AirTemperatureMax,
    AirTemperatureMin,
    RelativeHumidity,
    Precipitation,
    PrecipitationDaily,
    Pressure,
    Sun,
    Cloudiness,
    Wind,
    WindSpeed,
    WindDirection,
    Solar,
    SolarGlobal,
    SolarDiffuse,
    SolarDuration,
    SolarLong,
    SolarIn,
}

impl Variable {
    pub const ALL: [Variable; 18] = [
        Variable::AirTemperature,
        Variable::AirTemperatureMax,
        Variable::AirTemperatureMin,
        Variable::RelativeHumidity,
        Variable::Precipitation,
        Variable::PrecipitationDaily,
        Variable::Pressure,
        Variable::Sun,
        Variable::Cloudiness,
        Variable::Wind,
        Variable::WindSpeed,
        Variable::WindDirection,
        Variable::Solar,
        Variable::SolarGlobal,
        Variable::SolarDiffuse,
        Variable::SolarDuration,
        Variable::SolarLong,
        Variable::SolarIn,
    ];

    /// The snake_case name, also used as the result column name.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::AirTemperature => "air_temperature",
            Variable::AirTemperatureMax => "air_temperature_max",
            Variable::AirTemperatureMin => "air_temperature_min",
            Variable::RelativeHumidity => "relative_humidity",
            Variable::Precipitation => "precipitation",
            Variable::PrecipitationDaily => "precipitation_daily",
            Variable::Pressure => "pressure",
            Variable::Sun => "sun",
            Variable::Cloudiness => "cloudiness",
            Variable::Wind => "wind",
            Variable::WindSpeed => "wind_speed",
            Variable::WindDirection => "wind_direction",
            Variable::Solar => "solar",
            Variable::SolarGlobal => "solar_global",
            Variable::SolarDiffuse => "solar_diffuse",
            Variable::SolarDuration => "solar_duration",
            Variable::SolarLong => "solar_long",
            Variable::SolarIn => "solar_in",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parses a logical name. Compound names that are not known exactly but start with a family
/// prefix (`solar_...`, `wind_...`) collapse to that family.
impl FromStr for Variable {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(variable) = Variable::ALL.iter().find(|v| v.name() == s) {
            return Ok(*variable);
        }
        if s.starts_with("solar") {
            return Ok(Variable::Solar);
        }
        if s.starts_with("wind") {
            return Ok(Variable::Wind);
        }
        Err(NamingError::UnknownVariableName(s.to_string()))
    }
}

/// A fully specified request for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableSpec {
    pub variable: Variable,
    pub resolution: Resolution,
    pub era: Option<Era>,
}

impl VariableSpec {
    pub fn new(variable: Variable, resolution: Resolution, era: Option<Era>) -> Self {
        Self {
            variable,
            resolution,
            era,
        }
    }
}
