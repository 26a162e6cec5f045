//! Task file storage with XDG path support.
//!
//! The task list is stored as JSON at `~/.local/share/tb/tasks.json` by default.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use taskbook_model_rs::models::Task;
use thiserror::Error;
use tracing::debug;

/// Default task filename.
const TASKS_FILENAME: &str = "tasks.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "tb";

/// Errors that can occur during task storage operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read task file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for task store operations.
pub type Result<T> = std::result::Result<T, TaskStoreError>;

/// The on-disk task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    /// Tasks in the order the user keeps them.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Persistent storage for the task list.
///
/// # Example
///
/// ```no_run
/// use taskbook_filter_rs::TaskStore;
///
/// let store = TaskStore::new()?;
/// let list = store.load_or_default()?;
/// println!("{} tasks", list.tasks.len());
/// # Ok::<(), taskbook_filter_rs::TaskStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaskStore {
    /// Path to the task file.
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new `TaskStore` with the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `TaskStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a new `TaskStore` with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the task file.
    ///
    /// On Unix: `~/.local/share/tb/tasks.json`
    /// On macOS: `~/Library/Application Support/tb/tasks.json`
    ///
    /// # Errors
    ///
    /// Returns `TaskStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(TaskStoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(TASKS_FILENAME))
    }

    /// Returns the path to the task file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the task list from disk.
    ///
    /// # Errors
    ///
    /// - Returns `TaskStoreError::ReadError` if the file cannot be read.
    /// - Returns `TaskStoreError::Json` if the file is not a valid task list.
    pub fn load(&self) -> Result<TaskList> {
        let contents = fs::read_to_string(&self.path).map_err(|e| TaskStoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let list: TaskList = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), tasks = list.tasks.len(), "loaded task list");
        Ok(list)
    }

    /// Loads the task list, returning an empty list if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// - Returns `TaskStoreError::ReadError` for I/O errors other than "file not found".
    /// - Returns `TaskStoreError::Json` if the file is not a valid task list.
    pub fn load_or_default(&self) -> Result<TaskList> {
        match self.load() {
            Ok(list) => Ok(list),
            Err(TaskStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "no task file, using an empty list");
                Ok(TaskList::default())
            }
            Err(e) => Err(e),
        }
    }
}
