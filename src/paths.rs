//! Where career-todo keeps its data.
//!
//! The data file is resolved once at startup and handed to
//! [`TaskStore::open`](crate::store::TaskStore::open); nothing else reads the
//! environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// `$HOME/.career_todo/todos.json`
pub fn default_data_file() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".career_todo").join("todos.json"))
}

/// An explicit path (from `--file` or `CAREER_TODO_FILE`) wins over the default.
pub fn resolve_data_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p),
        None => default_data_file(),
    }
}

/// Where an unreadable data file is copied before it can be overwritten.
/// `todos.json` → `todos.json.corrupt`
pub fn corrupt_backup_path(data_file: &Path) -> PathBuf {
    let mut name: OsString = data_file.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}
