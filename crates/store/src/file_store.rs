//! File-based state store: two pretty-printed JSON files.
//!
//! - cursor file (default `roommate_config.json`): the [`RotationCursor`]
//! - schedules file (default `roommate_schedules.json`): the [`ScheduleBook`]
//!
//! Files are human-inspectable and hand-editable. Writes go to a sibling
//! temp file that is renamed over the target, so a crash mid-write leaves
//! the previous contents intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chorebot_core::cursor::RotationCursor;
use chorebot_core::error::PersistenceError;
use chorebot_core::schedule::ScheduleBook;
use chorebot_core::store::StateStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_CURSOR_FILE: &str = "roommate_config.json";
pub const DEFAULT_SCHEDULES_FILE: &str = "roommate_schedules.json";

pub struct FileStore {
    cursor_path: PathBuf,
    schedules_path: PathBuf,
    // Serializes writers within this process; rename keeps readers consistent.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(cursor_path: PathBuf, schedules_path: PathBuf) -> Self {
        Self {
            cursor_path,
            schedules_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Both files inside `dir`, with the given file names.
    pub fn in_dir(dir: &Path, cursor_file: &str, schedules_file: &str) -> Self {
        Self::new(dir.join(cursor_file), dir.join(schedules_file))
    }

    pub fn cursor_path(&self) -> &Path {
        &self.cursor_path
    }

    pub fn schedules_path(&self) -> &Path {
        &self.schedules_path
    }

    /// Read and decode a JSON file. A missing file is `Ok(None)`.
    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "State file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(PersistenceError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PersistenceError::Corrupted {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let write_err = |reason: String| PersistenceError::Write {
            path: path.to_path_buf(),
            reason,
        };

        let content = serde_json::to_string_pretty(value).map_err(|e| write_err(e.to_string()))?;

        let _guard = self.write_lock.lock().await;

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_err(format!("Failed to create state directory: {e}")))?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, content).map_err(|e| write_err(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| write_err(e.to_string()))?;

        debug!(path = %path.display(), "State file written");
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load_cursor(&self) -> Result<Option<RotationCursor>, PersistenceError> {
        Self::read_json(&self.cursor_path)
    }

    async fn save_cursor(&self, cursor: &RotationCursor) -> Result<(), PersistenceError> {
        self.write_json(&self.cursor_path, cursor).await
    }

    async fn load_month_schedules(&self) -> Result<ScheduleBook, PersistenceError> {
        Ok(Self::read_json(&self.schedules_path)?.unwrap_or_default())
    }

    async fn save_month_schedules(&self, book: &ScheduleBook) -> Result<(), PersistenceError> {
        self.write_json(&self.schedules_path, book).await
    }
}
