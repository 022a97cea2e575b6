//! Month schedules and the book of all generated months.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::{ChoreWeek, MonthKey};

/// One week handed to one roommate.
///
/// Serializes flat: `{ roommate, start_date, end_date, week_num }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub roommate: String,

    #[serde(flatten)]
    pub week: ChoreWeek,
}

/// A month's assignments in week order.
pub type MonthSchedule = Vec<Assignment>;

/// The stored value for one month key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    #[serde(default)]
    pub schedules: MonthSchedule,
}

/// Every generated month, keyed `"{year}-{month}"` and ordered chronologically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleBook {
    months: BTreeMap<MonthKey, MonthRecord>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MonthKey) -> Option<&MonthSchedule> {
        self.months.get(&key).map(|record| &record.schedules)
    }

    pub fn get_mut(&mut self, key: MonthKey) -> Option<&mut MonthSchedule> {
        self.months.get_mut(&key).map(|record| &mut record.schedules)
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.months.contains_key(&key)
    }

    pub fn insert(&mut self, key: MonthKey, schedules: MonthSchedule) {
        self.months.insert(key, MonthRecord { schedules });
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.months.keys().copied()
    }
}
