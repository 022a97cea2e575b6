//! Best-effort persistence policy.
//!
//! Storage failures never reach the engine's callers:
//! - read failure (unreadable or corrupted file) → log a warning, use defaults
//! - write failure → log a warning, carry on with the in-memory result
//!
//! This is the only place that policy is applied; stores themselves report
//! every failure as a `PersistenceError`.

use std::sync::Arc;

use chorebot_core::cursor::RotationCursor;
use chorebot_core::schedule::ScheduleBook;
use chorebot_core::store::StateStore;
use tracing::{debug, warn};

pub struct BestEffortState {
    store: Arc<dyn StateStore>,
}

impl BestEffortState {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// The stored cursor, a default one when absent or unreadable.
    ///
    /// An index past the end of the roster (the roster shrank since it was
    /// saved) is wrapped back into range.
    pub async fn cursor(&self, roster_len: usize) -> RotationCursor {
        let mut cursor = match self.store.load_cursor().await {
            Ok(Some(cursor)) => cursor,
            Ok(None) => {
                debug!(store = self.store.name(), "No rotation cursor stored, starting at 0");
                RotationCursor::default()
            }
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to load rotation cursor, using defaults");
                RotationCursor::default()
            }
        };

        if cursor.next_index >= roster_len {
            warn!(
                next_index = cursor.next_index,
                roster_len, "Stored rotation cursor out of range, wrapping"
            );
            cursor.next_index %= roster_len;
        }
        cursor
    }

    /// The stored schedule book, empty when absent or unreadable.
    pub async fn schedules(&self) -> ScheduleBook {
        match self.store.load_month_schedules().await {
            Ok(book) => book,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "Failed to load month schedules, starting empty");
                ScheduleBook::new()
            }
        }
    }

    pub async fn save_cursor(&self, cursor: &RotationCursor) {
        if let Err(e) = self.store.save_cursor(cursor).await {
            warn!(store = self.store.name(), error = %e, "Failed to save rotation cursor");
        }
    }

    pub async fn save_schedules(&self, book: &ScheduleBook) {
        if let Err(e) = self.store.save_month_schedules(book).await {
            warn!(store = self.store.name(), error = %e, "Failed to save month schedules");
        }
    }
}
