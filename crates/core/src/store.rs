//! StateStore trait: durable home of the rotation cursor and month schedules.
//!
//! Stores report every failure as a [`PersistenceError`]. Deciding what a
//! failure *means* (fall back to defaults, warn and continue) is the
//! caller's policy, not the store's.

use async_trait::async_trait;

use crate::cursor::RotationCursor;
use crate::error::PersistenceError;
use crate::schedule::ScheduleBook;

/// Implementations: JSON files, in-memory (for testing).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// The store name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Load the cursor; `Ok(None)` when nothing has been saved yet.
    async fn load_cursor(&self) -> Result<Option<RotationCursor>, PersistenceError>;

    /// Replace the stored cursor.
    async fn save_cursor(&self, cursor: &RotationCursor) -> Result<(), PersistenceError>;

    /// Load every stored month; an empty book when nothing has been saved yet.
    async fn load_month_schedules(&self) -> Result<ScheduleBook, PersistenceError>;

    /// Replace the whole schedule book.
    async fn save_month_schedules(&self, book: &ScheduleBook) -> Result<(), PersistenceError>;
}
