//! The rotation engine.
//!
//! Every load-mutate-save sequence runs under one commit lock, so two
//! requests generating the same new month concurrently advance the cursor
//! once and both see the same schedule.

use std::collections::BTreeMap;
use std::sync::Arc;

use chorebot_core::calendar::{self, ChoreWeek, MonthKey};
use chorebot_core::cursor::RotationCursor;
use chorebot_core::error::CalendarError;
use chorebot_core::roster::Roster;
use chorebot_core::schedule::{Assignment, MonthSchedule};
use chorebot_core::store::StateStore;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::RotationError;
use crate::policy::BestEffortState;

/// Longest preview window, in months.
pub const MAX_PREVIEW_MONTHS: u32 = 1200;

/// Maps `(year, month)` to the month's qualifying weeks.
pub type Partitioner = fn(i32, u32) -> Result<Vec<ChoreWeek>, CalendarError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    /// Computed by this call; the cursor moved.
    Generated,
    /// Returned from the store; the cursor did not move.
    Stored,
}

/// Result of [`RotationEngine::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Scheduled {
        schedule: MonthSchedule,
        cursor: RotationCursor,
        source: ScheduleSource,
    },
    /// The month has no qualifying weeks. Nothing was written.
    NoQualifyingWeeks { cursor: RotationCursor },
}

impl Generation {
    pub fn cursor(&self) -> &RotationCursor {
        match self {
            Self::Scheduled { cursor, .. } | Self::NoQualifyingWeeks { cursor } => cursor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationStatus {
    pub cursor: RotationCursor,
    pub next_roommate: String,
}

/// One month of a dry-run preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPreview {
    pub month: MonthKey,
    pub schedule: MonthSchedule,
    pub source: ScheduleSource,
    /// Cursor position once this month has been handed out.
    pub next_index: usize,
}

pub struct RotationEngine {
    roster: Roster,
    state: BestEffortState,
    partitioner: Partitioner,
    commit_lock: Mutex<()>,
}

impl RotationEngine {
    pub fn new(roster: Roster, store: Arc<dyn StateStore>) -> Self {
        Self {
            roster,
            state: BestEffortState::new(store),
            partitioner: calendar::partition,
            commit_lock: Mutex::new(()),
        }
    }

    /// Replace the week partitioner (tests exercise the empty-month path this way).
    pub fn with_partitioner(mut self, partitioner: Partitioner) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The schedule for `(year, month)`.
    ///
    /// The first call for a month assigns its weeks from the cursor, advances
    /// the cursor by the week count and stores both. Later calls return the
    /// stored schedule and leave the cursor alone.
    pub async fn generate(&self, year: i32, month: u32) -> Result<Generation, RotationError> {
        let key = MonthKey::new(year, month);
        key.first_day()?;

        let _guard = self.commit_lock.lock().await;
        let cursor = self.state.cursor(self.roster.len()).await;
        let mut book = self.state.schedules().await;

        if let Some(stored) = book.get(key) {
            debug!(month = %key, weeks = stored.len(), "Returning stored schedule");
            return Ok(Generation::Scheduled {
                schedule: stored.clone(),
                cursor,
                source: ScheduleSource::Stored,
            });
        }

        let weeks = (self.partitioner)(year, month)?;
        if weeks.is_empty() {
            info!(month = %key, "Month has no qualifying weeks");
            return Ok(Generation::NoQualifyingWeeks { cursor });
        }

        let schedule = self.assign(cursor.next_index, &weeks);
        let next = cursor.advanced(weeks.len(), self.roster.len(), key);

        self.state.save_cursor(&next).await;
        book.insert(key, schedule.clone());
        self.state.save_schedules(&book).await;

        info!(
            month = %key,
            weeks = weeks.len(),
            from = cursor.next_index,
            next = next.next_index,
            "Generated month schedule"
        );

        Ok(Generation::Scheduled {
            schedule,
            cursor: next,
            source: ScheduleSource::Generated,
        })
    }

    /// Make roommate `index` the one who starts the next ungenerated month.
    ///
    /// Returns that roommate's name. Stored schedules are not touched.
    pub async fn set_next_index(&self, index: i64) -> Result<String, RotationError> {
        let len = self.roster.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or(RotationError::InvalidIndex { index, len })?;

        let _guard = self.commit_lock.lock().await;
        let mut cursor = self.state.cursor(len).await;
        cursor.next_index = position;
        self.state.save_cursor(&cursor).await;

        let name = self.roster.rotate(position, 0).to_string();
        info!(next_index = position, roommate = %name, "Rotation cursor overridden");
        Ok(name)
    }

    /// Store a fresh cursor: first roommate next, no update metadata.
    pub async fn reset(&self) -> RotationCursor {
        let _guard = self.commit_lock.lock().await;
        let cursor = RotationCursor::default();
        self.state.save_cursor(&cursor).await;
        info!("Rotation cursor reset");
        cursor
    }

    /// Hand specific weeks of an already generated month to other roommates.
    ///
    /// `changes` maps 1-based week ordinals to roommate names. The whole batch
    /// is validated before anything is written; weeks not named keep their
    /// assignment. The cursor is never touched.
    pub async fn reassign_weeks(
        &self,
        year: i32,
        month: u32,
        changes: &BTreeMap<u32, String>,
    ) -> Result<MonthSchedule, RotationError> {
        let key = MonthKey::new(year, month);

        if let Some(unknown) = changes.values().find(|name| !self.roster.contains(name)) {
            return Err(RotationError::InvalidRoommateName(unknown.clone()));
        }

        let _guard = self.commit_lock.lock().await;
        let mut book = self.state.schedules().await;
        let schedule = book
            .get_mut(key)
            .ok_or(RotationError::MonthNotGenerated(key))?;

        if let Some(&ordinal) = changes
            .keys()
            .find(|ordinal| !schedule.iter().any(|a| a.week.ordinal == **ordinal))
        {
            return Err(RotationError::InvalidWeek {
                month: key,
                ordinal,
                weeks: schedule.len(),
            });
        }

        if changes.is_empty() {
            return Ok(schedule.clone());
        }

        for assignment in schedule.iter_mut() {
            if let Some(name) = changes.get(&assignment.week.ordinal) {
                assignment.roommate = name.clone();
            }
        }
        let updated = schedule.clone();
        self.state.save_schedules(&book).await;

        info!(month = %key, changed = changes.len(), "Reassigned weeks");
        Ok(updated)
    }

    pub async fn status(&self) -> RotationStatus {
        let cursor = self.state.cursor(self.roster.len()).await;
        let next_roommate = self.roster.rotate(cursor.next_index, 0).to_string();
        RotationStatus {
            cursor,
            next_roommate,
        }
    }

    /// The stored schedule for a month, if it has been generated.
    pub async fn stored_schedule(&self, year: i32, month: u32) -> Option<MonthSchedule> {
        self.state
            .schedules()
            .await
            .get(MonthKey::new(year, month))
            .cloned()
    }

    /// Simulate `months` successive generations starting at `(year, month)`.
    ///
    /// Nothing is written. Months already stored are shown as stored and do
    /// not move the simulated cursor, exactly as `generate` would behave.
    /// `months` is capped at [`MAX_PREVIEW_MONTHS`].
    pub async fn preview(
        &self,
        year: i32,
        month: u32,
        months: u32,
    ) -> Result<Vec<MonthPreview>, RotationError> {
        let mut key = MonthKey::new(year, month);
        key.first_day()?;

        let book = self.state.schedules().await;
        let mut next_index = self.state.cursor(self.roster.len()).await.next_index;
        let months = months.min(MAX_PREVIEW_MONTHS);
        let mut previews = Vec::with_capacity(months as usize);

        for _ in 0..months {
            let (schedule, source) = match book.get(key) {
                Some(stored) => (stored.clone(), ScheduleSource::Stored),
                None => {
                    let weeks = (self.partitioner)(key.year, key.month)?;
                    let schedule = self.assign(next_index, &weeks);
                    next_index = (next_index + weeks.len()) % self.roster.len();
                    (schedule, ScheduleSource::Generated)
                }
            };
            previews.push(MonthPreview {
                month: key,
                schedule,
                source,
                next_index,
            });
            key = key.next();
        }
        Ok(previews)
    }

    fn assign(&self, start: usize, weeks: &[ChoreWeek]) -> MonthSchedule {
        weeks
            .iter()
            .enumerate()
            .map(|(i, week)| Assignment {
                roommate: self.roster.rotate(start, i).to_string(),
                week: *week,
            })
            .collect()
    }
}
