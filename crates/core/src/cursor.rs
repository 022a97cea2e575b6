//! The persisted rotation cursor.

use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;

/// Whose turn starts the next ungenerated month, plus when it last moved.
///
/// Missing fields deserialize to their defaults. The older
/// `next_roommate_index` field name is still accepted; when a file carries
/// both names, `next_index` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CursorRecord")]
pub struct RotationCursor {
    pub next_index: usize,
    pub last_updated_year: Option<i32>,
    pub last_updated_month: Option<u32>,
}

/// On-disk shape, old and new field names side by side.
#[derive(Deserialize)]
struct CursorRecord {
    #[serde(default)]
    next_index: Option<usize>,
    #[serde(default)]
    next_roommate_index: Option<usize>,
    #[serde(default)]
    last_updated_year: Option<i32>,
    #[serde(default)]
    last_updated_month: Option<u32>,
}

impl From<CursorRecord> for RotationCursor {
    fn from(record: CursorRecord) -> Self {
        Self {
            next_index: record
                .next_index
                .or(record.next_roommate_index)
                .unwrap_or_default(),
            last_updated_year: record.last_updated_year,
            last_updated_month: record.last_updated_month,
        }
    }
}

impl RotationCursor {
    pub fn last_updated(&self) -> Option<MonthKey> {
        match (self.last_updated_year, self.last_updated_month) {
            (Some(year), Some(month)) => Some(MonthKey::new(year, month)),
            _ => None,
        }
    }

    /// The cursor after `weeks` turns were handed out for `key`.
    pub fn advanced(&self, weeks: usize, roster_len: usize, key: MonthKey) -> Self {
        Self {
            next_index: (self.next_index + weeks) % roster_len,
            last_updated_year: Some(key.year),
            last_updated_month: Some(key.month),
        }
    }
}
