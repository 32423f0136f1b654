//! CF-convention time axis decoding.
//!
//! Monthly CMIP files store time as offsets (`days since 1850-01-01`) in one
//! of several model calendars. Only the calendar month of each step matters
//! here, so decoding is day-resolution.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Model calendars understood by [`TimeAxis::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Calendar {
    /// standard, gregorian, proleptic_gregorian
    Gregorian,
    /// noleap, 365_day
    NoLeap,
    /// 360_day
    Day360,
}

impl Calendar {
    /// Parse a CF `calendar` attribute; a missing attribute means standard.
    pub fn from_attr(attr: Option<&str>) -> Option<Self> {
        match attr.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("standard") | Some("gregorian") | Some("proleptic_gregorian") => {
                Some(Self::Gregorian)
            }
            Some("noleap") | Some("365_day") => Some(Self::NoLeap),
            Some("360_day") => Some(Self::Day360),
            _ => None,
        }
    }
}

/// The time coordinate of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeAxis {
    pub values: Vec<f64>,
    pub units: Option<String>,
    pub calendar: Option<String>,
}

impl TimeAxis {
    pub fn new(values: Vec<f64>, units: Option<String>, calendar: Option<String>) -> Self {
        Self {
            values,
            units,
            calendar,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decode step `index` to a calendar date (year, month, day).
    ///
    /// Returns `None` when the units are not `<unit> since <date>`, the unit is
    /// not days or hours, the calendar is unsupported, or the offset is not
    /// finite or lands outside the representable date range.
    pub fn decode(&self, index: usize) -> Option<(i32, u32, u32)> {
        let offset = *self.values.get(index)?;
        let (unit, epoch) = parse_units(self.units.as_deref()?)?;
        let days = match unit {
            TimeUnit::Days => offset,
            TimeUnit::Hours => offset / 24.0,
        };
        if !days.is_finite() || days.abs() > MAX_OFFSET_DAYS {
            return None;
        }
        let days = days.floor() as i64;
        match Calendar::from_attr(self.calendar.as_deref())? {
            Calendar::Gregorian => {
                let date = epoch.checked_add_signed(Duration::try_days(days)?)?;
                Some((date.year(), date.month(), date.day()))
            }
            Calendar::NoLeap => add_days_noleap(epoch, days),
            Calendar::Day360 => add_days_360(epoch, days),
        }
    }

    /// Calendar month (1-12) of step `index`, when decodable.
    pub fn month_of(&self, index: usize) -> Option<u32> {
        self.decode(index).map(|(_, m, _)| m)
    }
}

enum TimeUnit {
    Days,
    Hours,
}

fn parse_units(units: &str) -> Option<(TimeUnit, NaiveDate)> {
    let (unit, reference) = units.split_once(" since ")?;
    let unit = match unit.trim().to_ascii_lowercase().as_str() {
        "days" | "day" | "d" => TimeUnit::Days,
        "hours" | "hour" | "h" => TimeUnit::Hours,
        _ => return None,
    };
    let reference = reference.trim();
    let epoch = NaiveDateTime::parse_from_str(reference, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(reference, "%Y-%m-%d"))
        .or_else(|_| {
            // "1850-1-1 0:0:0" style references
            let date_part = reference.split_whitespace().next().unwrap_or(reference);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        })
        .ok()?;
    Some((unit, epoch))
}

/// About 27 000 years; far past any model run, well inside `i32` years.
const MAX_OFFSET_DAYS: f64 = 1.0e7;

const NOLEAP_MONTH_DAYS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn add_days_noleap(epoch: NaiveDate, days: i64) -> Option<(i32, u32, u32)> {
    let start_doy: i64 = NOLEAP_MONTH_DAYS[..epoch.month0() as usize].iter().sum::<i64>()
        + epoch.day0() as i64;
    let total = start_doy.checked_add(days)?;
    let year = epoch
        .year()
        .checked_add(i32::try_from(total.div_euclid(365)).ok()?)?;
    let mut doy = total.rem_euclid(365);
    let mut month = 0;
    while doy >= NOLEAP_MONTH_DAYS[month] {
        doy -= NOLEAP_MONTH_DAYS[month];
        month += 1;
    }
    Some((year, month as u32 + 1, doy as u32 + 1))
}

fn add_days_360(epoch: NaiveDate, days: i64) -> Option<(i32, u32, u32)> {
    let start = epoch.month0() as i64 * 30 + (epoch.day0() as i64).min(29);
    let total = start.checked_add(days)?;
    let year = epoch
        .year()
        .checked_add(i32::try_from(total.div_euclid(360)).ok()?)?;
    let doy = total.rem_euclid(360);
    Some((year, (doy / 30) as u32 + 1, (doy % 30) as u32 + 1))
}
