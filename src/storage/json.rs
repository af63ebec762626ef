//! JSON storage for the task list
//!
//! The whole list lives in a single JSON document:
//!
//! ```json
//! {"next_id": 3, "tasks": [{"id": 1, "description": "...", ...}]}
//! ```
//!
//! Tasks are written oldest-first. A bare array of tasks (the older format)
//! is still read; its `next_id` is derived from the highest stored id.
//!
//! Access is serialized on a sidecar `<file>.lock`: readers take it shared,
//! writers exclusive. Each write goes to a fresh temp file in the same
//! directory and is renamed over the store, so readers only ever see a
//! complete document.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::{Task, TaskList};

/// Document layout on disk
#[derive(Serialize)]
struct TaskFileOut<'a> {
    next_id: u64,
    tasks: Vec<&'a Task>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFileIn {
    Current { next_id: u64, tasks: Vec<Task> },
    Legacy(Vec<Task>),
}

impl TaskFileIn {
    fn into_list(self) -> Result<TaskList> {
        let (tasks, next_id) = match self {
            TaskFileIn::Current { next_id, tasks } => (tasks, next_id),
            TaskFileIn::Legacy(tasks) => {
                let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
                let next_id = max_id
                    .checked_add(1)
                    .with_context(|| format!("Task id {} leaves no room for new tasks", max_id))?;
                (tasks, next_id)
            }
        };

        // next_id is handed out and then incremented, so it must stay in 1..MAX
        if next_id == 0 || next_id == u64::MAX {
            anyhow::bail!("next_id {} is out of range", next_id);
        }

        if let Some(task) = tasks.iter().find(|t| t.id >= next_id) {
            anyhow::bail!(
                "Task {} has an id not below next_id {}",
                task.id,
                next_id
            );
        }

        let mut seen = HashSet::new();
        if let Some(task) = tasks.iter().find(|t| !seen.insert(t.id)) {
            anyhow::bail!("Duplicate task id {}", task.id);
        }

        Ok(TaskList::from_parts(tasks, next_id))
    }
}

/// Store for the task list in JSON format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the sidecar lock file
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("tasks.json"));
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Directory holding the store, `.` for a bare file name
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn open_lock(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())
            .with_context(|| format!("Failed to open lock file: {}", self.lock_path().display()))
    }

    /// Takes the exclusive writer lock, creating the directory if needed
    fn lock_exclusive(&self) -> Result<File> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on task store")?;
        Ok(lock)
    }

    /// Loads the task list, or an empty one if the file does not exist yet
    pub fn load(&self) -> Result<TaskList> {
        if !self.path.exists() {
            return Ok(TaskList::new());
        }

        // Lock is released when the file is dropped
        let lock = self.open_lock()?;
        lock.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        self.read()
    }

    /// Writes the whole list, replacing the stored one atomically
    pub fn save(&self, list: &TaskList) -> Result<()> {
        let _lock = self.lock_exclusive()?;
        self.write(list)
    }

    /// Loads, transforms and saves the list under one exclusive lock
    ///
    /// `f` returns the new list plus a value handed back to the caller.
    /// When `f` fails nothing is written.
    pub fn update<T>(&self, f: impl FnOnce(&TaskList) -> Result<(TaskList, T)>) -> Result<T> {
        let _lock = self.lock_exclusive()?;
        let (next, out) = f(&self.read()?)?;
        self.write(&next)?;
        Ok(out)
    }

    /// Reads the document; the caller holds the lock
    fn read(&self) -> Result<TaskList> {
        if !self.path.exists() {
            return Ok(TaskList::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        let document: TaskFileIn = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse task store: {}", self.path.display()))?;

        document
            .into_list()
            .with_context(|| format!("Corrupt task store: {}", self.path.display()))
    }

    /// Writes through a fresh temp file; the caller holds the exclusive lock
    fn write(&self, list: &TaskList) -> Result<()> {
        let dir = self.dir();
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let document = TaskFileOut {
                next_id: list.next_id(),
                tasks: list.all(),
            };

            serde_json::to_writer_pretty(&mut writer, &document)
                .context("Failed to serialize task list")?;
            writeln!(writer).context("Failed to write task store")?;
            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        temp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}
