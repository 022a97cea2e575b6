//! Week partitioner: splits a calendar month into chore weeks.
//!
//! Weeks run Monday to Sunday. A month owns every week that *starts* on or
//! after its 1st and still touches the month, so:
//! - a leading week that began in the previous month belongs to that month,
//!   even when most of its days fall in this one;
//! - a trailing week that spills into the next month belongs to this one.
//!
//! Everything here is pure proleptic Gregorian arithmetic via `chrono`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

/// A `(year, month)` pair, serialized as `"{year}-{month}"` (e.g. `"2025-1"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// First day of the month, or `InvalidMonth` when the pair is not a real month.
    pub fn first_day(&self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(CalendarError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    /// Last day of the month.
    pub fn last_day(&self) -> Result<NaiveDate, CalendarError> {
        self.first_day()?
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or(self.out_of_range())
    }

    /// The following month, wrapping December into January of the next year.
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    fn out_of_range(&self) -> CalendarError {
        CalendarError::InvalidMonth {
            year: self.year,
            month: self.month,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // rsplit so a negative year ("-5-3") still parses
        let (year, month) = s
            .rsplit_once('-')
            .ok_or_else(|| CalendarError::InvalidKey(s.to_string()))?;
        let year = year
            .parse()
            .map_err(|_| CalendarError::InvalidKey(s.to_string()))?;
        let month = month
            .parse()
            .map_err(|_| CalendarError::InvalidKey(s.to_string()))?;
        Ok(Self::new(year, month))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One Monday–Sunday span assigned to a single roommate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreWeek {
    #[serde(with = "slash_date")]
    pub start_date: NaiveDate,

    #[serde(with = "slash_date")]
    pub end_date: NaiveDate,

    /// 1-based position within the month's week list.
    #[serde(rename = "week_num")]
    pub ordinal: u32,
}

impl ChoreWeek {
    /// Whether any day of this week falls inside `key`'s month.
    pub fn touches(&self, key: MonthKey) -> bool {
        self.start_date
            .iter_days()
            .take_while(|d| *d <= self.end_date)
            .any(|d| MonthKey::of(d) == key)
    }
}

/// Every Monday-start week intersecting the month, before any filtering.
///
/// Ordinals number the raw list. Used for week analysis; schedules come
/// from [`partition`].
pub fn calendar_weeks(year: i32, month: u32) -> Result<Vec<ChoreWeek>, CalendarError> {
    let key = MonthKey::new(year, month);
    let first = key.first_day()?;
    let last = key.last_day()?;

    let back = u64::from(first.weekday().num_days_from_monday());
    let mut start = first
        .checked_sub_days(Days::new(back))
        .ok_or(key.out_of_range())?;

    let mut weeks = Vec::with_capacity(6);
    while start <= last {
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or(key.out_of_range())?;
        weeks.push(ChoreWeek {
            start_date: start,
            end_date: end,
            ordinal: weeks.len() as u32 + 1,
        });
        start = end.succ_opt().ok_or(key.out_of_range())?;
    }
    Ok(weeks)
}

/// Qualifying chore weeks of a month, in chronological order.
///
/// The result is never empty for a real month, but callers must not rely on
/// that: the rotation engine reports an empty partition as data.
pub fn partition(year: i32, month: u32) -> Result<Vec<ChoreWeek>, CalendarError> {
    let key = MonthKey::new(year, month);
    let first = key.first_day()?;

    let weeks = calendar_weeks(year, month)?
        .into_iter()
        // Started in the previous month (December of last year for January).
        .filter(|week| week.start_date >= first)
        .filter(|week| week.touches(key))
        .enumerate()
        .map(|(i, week)| ChoreWeek {
            ordinal: i as u32 + 1,
            ..week
        })
        .collect();
    Ok(weeks)
}

/// `YYYY/MM/DD` date encoding used by the schedule file.
pub(crate) mod slash_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
