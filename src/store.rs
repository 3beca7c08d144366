//! Task persistence.
//!
//! `JsonFileStore` keeps the list in `{data_dir}/tasks.json` as a pretty-printed
//! JSON array of strings. `MemoryStore` holds it in memory for tests and for
//! sessions that should not touch disk. Neither locks: last writer wins.

use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// File name of the task list inside the data directory
pub const TASKS_FILE: &str = "tasks.json";

/// Ordered list of task names with whole-list load and save
pub trait TaskStore {
    /// Current tasks in insertion order. Never fails; unreadable storage is empty.
    fn load(&self) -> Vec<String>;

    /// Replace the stored list with `tasks`
    fn save(&mut self, tasks: &[String]) -> Result<()>;

    /// Append `task` to the end of the list
    fn add(&mut self, task: &str) -> Result<()> {
        let mut tasks = self.load();
        tasks.push(task.to_string());
        self.save(&tasks)
    }

    /// Remove the first exact match of `task`. Returns whether anything was removed.
    fn remove(&mut self, task: &str) -> Result<bool> {
        let mut tasks = self.load();
        match tasks.iter().position(|t| t == task) {
            Some(idx) => {
                tasks.remove(idx);
                self.save(&tasks)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Task list backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    path: PathBuf,
}

impl JsonFileStore {
    /// Store under `dir`. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(TASKS_FILE);
        JsonFileStore { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Vec<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read task file, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items.into_iter().map(stringify).collect(),
            Ok(_) => {
                warn!(path = %self.path.display(), "task file is not a JSON array, treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt task file, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&mut self, tasks: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename over it so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, tasks)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        info!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Task list held in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryStore {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    /// Drop every task
    pub fn reset(&mut self) {
        self.tasks.clear();
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<String> {
        self.tasks.clone()
    }

    fn save(&mut self, tasks: &[String]) -> Result<()> {
        self.tasks = tasks.to_vec();
        Ok(())
    }
}
