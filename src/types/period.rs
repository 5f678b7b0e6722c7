//! Partial-date bounds used to restrict an assembled series to a period.
//!
//! A bound may be as coarse as a year or as precise as a timestamp. When used as the lower end of
//! a range it resolves to the first instant of its period; as the upper end it resolves to the
//! last instant, so `2015..=2015` covers the whole year.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Could not interpret '{0}' as a year, month, date or timestamp")]
pub struct ParseDateBoundError(pub String);

/// The first and last instant of a (possibly partial) date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateBound {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateBound {
    fn spanning(first_day: NaiveDate, last_day: NaiveDate) -> Option<Self> {
        Some(Self {
            start: first_day.and_hms_opt(0, 0, 0)?,
            end: last_day.and_hms_nano_opt(23, 59, 59, 999_999_999)?,
        })
    }

    pub fn from_year(year: Year) -> Option<Self> {
        Self::spanning(
            NaiveDate::from_ymd_opt(year.0, 1, 1)?,
            NaiveDate::from_ymd_opt(year.0, 12, 31)?,
        )
    }

    pub fn from_month(month: Month) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(month.year(), month.month(), 1)?;
        let (next_year, next_month) = if month.month() == 12 {
            (month.year().checked_add(1)?, 1)
        } else {
            (month.year(), month.month() + 1)
        };
        let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1);
        Self::spanning(first, last)
    }

    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::spanning(date, date)
    }

    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }
}

impl From<NaiveDateTime> for DateBound {
    fn from(value: NaiveDateTime) -> Self {
        DateBound::at(value)
    }
}

impl TryFrom<NaiveDate> for DateBound {
    type Error = ParseDateBoundError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        DateBound::from_date(value).ok_or_else(|| ParseDateBoundError(value.to_string()))
    }
}

impl TryFrom<Year> for DateBound {
    type Error = ParseDateBoundError;

    fn try_from(value: Year) -> Result<Self, Self::Error> {
        DateBound::from_year(value).ok_or_else(|| ParseDateBoundError(value.to_string()))
    }
}

impl TryFrom<Month> for DateBound {
    type Error = ParseDateBoundError;

    fn try_from(value: Month) -> Result<Self, Self::Error> {
        DateBound::from_month(value).ok_or_else(|| ParseDateBoundError(value.to_string()))
    }
}

impl TryFrom<i32> for DateBound {
    type Error = ParseDateBoundError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        DateBound::try_from(Year(value))
    }
}

impl FromStr for DateBound {
    type Err = ParseDateBoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseDateBoundError(s.to_string());
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(instant) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(DateBound::at(instant));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return DateBound::from_date(date).ok_or_else(err);
        }
        match s.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year.parse().map_err(|_| err())?;
                let month: u32 = month.parse().map_err(|_| err())?;
                DateBound::from_month(Month(year, month)).ok_or_else(err)
            }
            None => {
                let year: i32 = s.parse().map_err(|_| err())?;
                DateBound::from_year(Year(year)).ok_or_else(err)
            }
        }
    }
}
