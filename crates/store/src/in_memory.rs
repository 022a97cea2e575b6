//! In-memory store: useful for testing and ephemeral runs.

use async_trait::async_trait;
use chorebot_core::cursor::RotationCursor;
use chorebot_core::error::PersistenceError;
use chorebot_core::schedule::ScheduleBook;
use chorebot_core::store::StateStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps both records in memory; nothing survives the process.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    cursor: Arc<RwLock<Option<RotationCursor>>>,
    schedules: Arc<RwLock<ScheduleBook>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing cursor.
    pub fn with_cursor(cursor: RotationCursor) -> Self {
        Self {
            cursor: Arc::new(RwLock::new(Some(cursor))),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load_cursor(&self) -> Result<Option<RotationCursor>, PersistenceError> {
        Ok(self.cursor.read().await.clone())
    }

    async fn save_cursor(&self, cursor: &RotationCursor) -> Result<(), PersistenceError> {
        *self.cursor.write().await = Some(cursor.clone());
        Ok(())
    }

    async fn load_month_schedules(&self) -> Result<ScheduleBook, PersistenceError> {
        Ok(self.schedules.read().await.clone())
    }

    async fn save_month_schedules(&self, book: &ScheduleBook) -> Result<(), PersistenceError> {
        *self.schedules.write().await = book.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryStore::new();
        assert!(store.load_cursor().await.unwrap().is_none());
        assert!(store.load_month_schedules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::with_cursor(RotationCursor {
            next_index: 1,
            ..RotationCursor::default()
        });
        let other = store.clone();
        other.save_cursor(&RotationCursor::default()).await.unwrap();
        assert_eq!(store.load_cursor().await.unwrap().unwrap().next_index, 0);
    }
}
