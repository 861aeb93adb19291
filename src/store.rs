use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::model::Task;
use crate::paths::corrupt_backup_path;

/// Held for the duration of every file write in this process.
static SAVE_LOCK: Mutex<()> = Mutex::new(());

/// Wait for any in-flight save to finish, then keep further saves from
/// starting while the guard lives. Taken before exiting from a signal
/// handler so the file is never left half-written.
pub fn block_saves() -> MutexGuard<'static, ()> {
    SAVE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// The JSON file holding every task.
///
/// Reads and writes always cover the whole file. There is no locking: two
/// processes writing at once race and the last write wins.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }
        Ok(())
    }

    /// Load all tasks.
    ///
    /// A missing file is an empty list. A file that is not a JSON array of
    /// tasks is also an empty list: the bytes are copied to
    /// `<file>.corrupt` and a warning is logged, so the next save cannot
    /// lose them silently.
    pub fn load(&self) -> Result<Vec<Task>> {
        self.ensure_dir()?;
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        match serde_json::from_slice::<Vec<Task>>(&data) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!(
                    "{} is not a valid task list ({e}); starting with an empty list",
                    self.path.display()
                );
                self.back_up_corrupt(&data);
                Ok(Vec::new())
            }
        }
    }

    fn back_up_corrupt(&self, data: &[u8]) {
        let backup = corrupt_backup_path(&self.path);
        match fs::write(&backup, data) {
            Ok(()) => warn!("copied unreadable data to {}", backup.display()),
            Err(e) => warn!("failed to back up unreadable data to {}: {e}", backup.display()),
        }
    }

    /// Overwrite the file with `tasks` as pretty-printed UTF-8 JSON.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(tasks)?;
        let _guard = block_saves();
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!("saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
pub fn temp_store() -> (tempfile::TempDir, TaskStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::open(dir.path().join("nested").join("todos.json"));
    (dir, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::model::{Category, Priority};

    fn sample(id: u32, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            category: Category::CoverLetter,
            priority: Priority::High,
            due_date: None,
            done: false,
            created_at: NaiveDateTime::parse_from_str("2026-01-01 10:00", "%Y-%m-%d %H:%M")
                .unwrap(),
            updated_at: None,
            notes: String::new(),
        }
    }

    #[test]
    fn missing_file_is_empty_and_creates_dir() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.path().parent().unwrap().is_dir());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = temp_store();
        let tasks = vec![sample(1, "자소서 STAR 1개"), sample(2, "portfolio")];
        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn non_ascii_written_literally() {
        let (_dir, store) = temp_store();
        store.save(&[sample(1, "면접 질문")]).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("면접 질문"));
        assert!(raw.contains("\"자소서\""));
        assert!(raw.contains("\n  {"));
    }

    #[test]
    fn resave_is_byte_identical() {
        let (_dir, store) = temp_store();
        store.save(&[sample(1, "a"), sample(5, "b")]).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        let second = fs::read(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn object_instead_of_list_is_empty() {
        let (_dir, store) = temp_store();
        store.ensure_dir().unwrap();
        fs::write(store.path(), r#"{"not": "a list"}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
        // Original bytes untouched, copy kept aside.
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"{"not": "a list"}"#
        );
        let backup = corrupt_backup_path(store.path());
        assert_eq!(fs::read_to_string(backup).unwrap(), r#"{"not": "a list"}"#);
    }

    #[test]
    fn garbage_is_empty() {
        let (_dir, store) = temp_store();
        store.ensure_dir().unwrap();
        fs::write(store.path(), "[{\"id\": ").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn stale_date_format_is_treated_as_corrupt() {
        let (_dir, store) = temp_store();
        store.ensure_dir().unwrap();
        let raw = r#"[{"id":1,"title":"t","due_date":"2026-1-5","created_at":"2026-01-01 09:00"}]"#;
        fs::write(store.path(), raw).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(corrupt_backup_path(store.path())).unwrap(), raw);
    }

    #[test]
    fn save_waits_while_saves_are_blocked() {
        let (_dir, store) = temp_store();
        let guard = block_saves();
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || store.save(&[sample(1, "a")]))
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!store.path().exists());
        drop(guard);
        writer.join().unwrap().unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // Parent "directory" is a regular file.
        let store = TaskStore::open(blocker.join("todos.json"));
        assert!(store.save(&[]).is_err());
    }
}
