//! The alias/override table behind the naming resolver.
//!
//! Each [`Family`] describes one remote directory (short codes, era handling, timestamp format).
//! Each [`NamingRow`] maps a (resolution, logical variable) pair onto a family and the data columns
//! to read from its files. Aliases are nothing more than several rows sharing a family: all wind
//! variables read the `wind` archives, relative humidity reads the air temperature archives, the
//! daily min/max temperature and precipitation read the `kl` archives.

use crate::types::resolution::Resolution;
use crate::types::variable::Variable;
use chrono::{NaiveDate, NaiveDateTime};

/// How `MESS_DATUM` is written in a family's data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `%Y%m%d%H%M`
    Minute,
    /// `%Y%m%d%H`
    Hour,
    /// `%Y%m%d%H:%M`, used by the hourly solar files.
    HourMinute,
    /// `%Y%m%d`
    Day,
}

impl TimestampFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::Minute => "%Y%m%d%H%M",
            TimestampFormat::Hour => "%Y%m%d%H",
            TimestampFormat::HourMinute => "%Y%m%d%H:%M",
            TimestampFormat::Day => "%Y%m%d",
        }
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        match self {
            TimestampFormat::Day => NaiveDate::parse_from_str(raw, self.pattern())
                .ok()?
                .and_hms_opt(0, 0, 0),
            // chrono refuses a datetime without minutes, so pad the hour form.
            TimestampFormat::Hour => NaiveDateTime::parse_from_str(
                &format!("{raw}00"),
                TimestampFormat::Minute.pattern(),
            )
            .ok(),
            TimestampFormat::Minute | TimestampFormat::HourMinute => {
                NaiveDateTime::parse_from_str(raw, self.pattern()).ok()
            }
        }
    }
}

/// A remote variable family directory.
#[derive(Debug, PartialEq, Eq)]
pub struct Family {
    /// Directory name below the resolution directory.
    pub name: &'static str,
    /// Code used in archive filenames (`stundenwerte_{short_code}_00003_...zip`).
    pub short_code: &'static str,
    /// Code used in the roster filename.
    pub roster_code: &'static str,
    /// The family has no historical/recent/now split.
    pub omits_era: bool,
    pub timestamp: TimestampFormat,
}

/// A data file column and the name it gets in the assembled series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataColumn {
    pub raw: &'static str,
    pub result: &'static str,
}

#[derive(Debug)]
pub struct NamingRow {
    pub resolution: Resolution,
    pub variable: Variable,
    pub family: &'static Family,
    pub columns: &'static [DataColumn],
}

macro_rules! row {
    ($resolution:expr, $variable:expr, $family:expr, [$(($raw:literal, $result:literal)),+ $(,)?] $(,)?) => {
        NamingRow {
            resolution: $resolution,
            variable: $variable,
            family: $family,
            columns: &[$(DataColumn { raw: $raw, result: $result }),+],
        }
    };
}

static TEN_MIN_AIR: Family = Family {
    name: "air_temperature",
    short_code: "TU",
    roster_code: "tu",
    omits_era: false,
    timestamp: TimestampFormat::Minute,
};
static TEN_MIN_PRECIPITATION: Family = Family {
    name: "precipitation",
    short_code: "nieder",
    roster_code: "rr",
    omits_era: false,
    timestamp: TimestampFormat::Minute,
};
static TEN_MIN_WIND: Family = Family {
    name: "wind",
    short_code: "wind",
    roster_code: "ff",
    omits_era: false,
    timestamp: TimestampFormat::Minute,
};
static TEN_MIN_SOLAR: Family = Family {
    name: "solar",
    short_code: "SOLAR",
    roster_code: "sd",
    omits_era: false,
    timestamp: TimestampFormat::Minute,
};

static HOURLY_AIR: Family = Family {
    name: "air_temperature",
    short_code: "TU",
    roster_code: "TU",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_PRECIPITATION: Family = Family {
    name: "precipitation",
    short_code: "RR",
    roster_code: "RR",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_PRESSURE: Family = Family {
    name: "pressure",
    short_code: "P0",
    roster_code: "P0",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_SUN: Family = Family {
    name: "sun",
    short_code: "SD",
    roster_code: "SD",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_CLOUDINESS: Family = Family {
    name: "cloudiness",
    short_code: "N",
    roster_code: "N",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_WIND: Family = Family {
    name: "wind",
    short_code: "FF",
    roster_code: "FF",
    omits_era: false,
    timestamp: TimestampFormat::Hour,
};
static HOURLY_SOLAR: Family = Family {
    name: "solar",
    short_code: "ST",
    roster_code: "ST",
    omits_era: true,
    timestamp: TimestampFormat::HourMinute,
};

static DAILY_KL: Family = Family {
    name: "kl",
    short_code: "KL",
    roster_code: "KL",
    omits_era: false,
    timestamp: TimestampFormat::Day,
};
static DAILY_SOLAR: Family = Family {
    name: "solar",
    short_code: "ST",
    roster_code: "ST",
    omits_era: true,
    timestamp: TimestampFormat::Day,
};

use Resolution::{Daily, Hourly, TenMinutes};
use Variable as V;

pub static NAMING_TABLE: &[NamingRow] = &[
    // 10 minutes
    row!(TenMinutes, V::AirTemperature, &TEN_MIN_AIR, [("TT_10", "air_temperature")]),
    row!(TenMinutes, V::RelativeHumidity, &TEN_MIN_AIR, [("RF_10", "relative_humidity")]),
    row!(TenMinutes, V::Precipitation, &TEN_MIN_PRECIPITATION, [("RWS_10", "precipitation")]),
    row!(
        TenMinutes,
        V::Wind,
        &TEN_MIN_WIND,
        [("FF_10", "wind_speed"), ("DD_10", "wind_direction")],
    ),
    row!(TenMinutes, V::WindSpeed, &TEN_MIN_WIND, [("FF_10", "wind_speed")]),
    row!(TenMinutes, V::WindDirection, &TEN_MIN_WIND, [("DD_10", "wind_direction")]),
    row!(TenMinutes, V::Solar, &TEN_MIN_SOLAR, [("GS_10", "solar")]),
    row!(TenMinutes, V::SolarGlobal, &TEN_MIN_SOLAR, [("GS_10", "solar_global")]),
    row!(TenMinutes, V::SolarDiffuse, &TEN_MIN_SOLAR, [("DS_10", "solar_diffuse")]),
    row!(TenMinutes, V::SolarDuration, &TEN_MIN_SOLAR, [("SD_10", "solar_duration")]),
    row!(TenMinutes, V::SolarLong, &TEN_MIN_SOLAR, [("LS_10", "solar_long")]),
    // hourly
    row!(Hourly, V::AirTemperature, &HOURLY_AIR, [("TT_TU", "air_temperature")]),
    row!(Hourly, V::RelativeHumidity, &HOURLY_AIR, [("RF_TU", "relative_humidity")]),
    row!(Hourly, V::Precipitation, &HOURLY_PRECIPITATION, [("R1", "precipitation")]),
    row!(Hourly, V::Pressure, &HOURLY_PRESSURE, [("P0", "pressure")]),
    row!(Hourly, V::Sun, &HOURLY_SUN, [("SD_SO", "sun")]),
    row!(Hourly, V::Cloudiness, &HOURLY_CLOUDINESS, [("V_N", "cloudiness")]),
    row!(
        Hourly,
        V::Wind,
        &HOURLY_WIND,
        [("F", "wind_speed"), ("D", "wind_direction")],
    ),
    row!(Hourly, V::WindSpeed, &HOURLY_WIND, [("F", "wind_speed")]),
    row!(Hourly, V::WindDirection, &HOURLY_WIND, [("D", "wind_direction")]),
    row!(Hourly, V::Solar, &HOURLY_SOLAR, [("FG_LBERG", "solar")]),
    row!(Hourly, V::SolarGlobal, &HOURLY_SOLAR, [("FG_LBERG", "solar_global")]),
    row!(Hourly, V::SolarDiffuse, &HOURLY_SOLAR, [("FD_LBERG", "solar_diffuse")]),
    row!(Hourly, V::SolarDuration, &HOURLY_SOLAR, [("SD_LBERG", "solar_duration")]),
    row!(Hourly, V::SolarLong, &HOURLY_SOLAR, [("ATMO_LBERG", "solar_long")]),
    // daily
    row!(Daily, V::AirTemperature, &DAILY_KL, [("TMK", "air_temperature")]),
    row!(Daily, V::AirTemperatureMax, &DAILY_KL, [("TXK", "air_temperature_max")]),
    row!(Daily, V::AirTemperatureMin, &DAILY_KL, [("TNK", "air_temperature_min")]),
    row!(Daily, V::RelativeHumidity, &DAILY_KL, [("UPM", "relative_humidity")]),
    row!(Daily, V::Precipitation, &DAILY_KL, [("RSK", "precipitation")]),
    row!(Daily, V::PrecipitationDaily, &DAILY_KL, [("RSK", "precipitation_daily")]),
    row!(Daily, V::Pressure, &DAILY_KL, [("PM", "pressure")]),
    row!(Daily, V::Sun, &DAILY_KL, [("SDK", "sun")]),
    row!(Daily, V::WindSpeed, &DAILY_KL, [("FM", "wind_speed")]),
    row!(Daily, V::Solar, &DAILY_SOLAR, [("FG_STRAHL", "solar")]),
    row!(Daily, V::SolarGlobal, &DAILY_SOLAR, [("FG_STRAHL", "solar_global")]),
    row!(Daily, V::SolarIn, &DAILY_SOLAR, [("FG_STRAHL", "solar_in")]),
    row!(Daily, V::SolarDiffuse, &DAILY_SOLAR, [("FD_STRAHL", "solar_diffuse")]),
    row!(Daily, V::SolarDuration, &DAILY_SOLAR, [("SD_STRAHL", "solar_duration")]),
    row!(Daily, V::SolarLong, &DAILY_SOLAR, [("ATMO_STRAHL", "solar_long")]),
];

pub fn lookup(variable: Variable, resolution: Resolution) -> Option<&'static NamingRow> {
    NAMING_TABLE
        .iter()
        .find(|row| row.variable == variable && row.resolution == resolution)
}
