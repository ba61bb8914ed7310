//! Task tracking.
//!
//! A task collects the focus sessions finished while it was selected. The
//! engine knows nothing about tasks; `TaskTracker` listens for
//! `TimerEvent::FocusSessionCompleted` and credits the current task.

mod error;
mod tracker;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{read_json, write_json, TASKS_FILE};

pub use error::TaskError;
pub use tracker::TaskTracker;

/// Maximum task title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

// ============================================================================
// Task
// ============================================================================

/// A unit of work that focus sessions are counted against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_pomodoros: u32,
}

impl Task {
    /// Creates a task with a fresh id.
    fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            created_at: Utc::now(),
            completed_pomodoros: 0,
        }
    }

    /// Returns the first eight characters of the id, for display.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Trims and checks a task title.
fn validate_title(title: &str) -> Result<String, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(TaskError::TitleTooLong(len));
    }
    Ok(title.to_string())
}

// ============================================================================
// TaskList
// ============================================================================

/// Ordered task list with an optional current task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    current_task_id: Option<Uuid>,
}

impl TaskList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task. A task added while no existing task is selected becomes
    /// current.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed title is empty or too long.
    pub fn add(&mut self, title: &str) -> Result<&Task, TaskError> {
        let task = Task::new(validate_title(title)?);
        if self.current().is_none() {
            self.current_task_id = Some(task.id);
        }
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Removes a task, clearing the selection if it was current.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` matches no task.
    pub fn remove(&mut self, id: &str) -> Result<Task, TaskError> {
        let id = self.resolve(id)?;
        if self.current_task_id == Some(id) {
            self.current_task_id = None;
        }
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        Ok(self.tasks.remove(index))
    }

    /// Makes a task current.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` matches no task.
    pub fn select(&mut self, id: &str) -> Result<&Task, TaskError> {
        let id = self.resolve(id)?;
        self.current_task_id = Some(id);
        self.get(id).ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// Clears the current task.
    pub fn clear_selection(&mut self) {
        self.current_task_id = None;
    }

    /// Returns the current task, if any.
    pub fn current(&self) -> Option<&Task> {
        self.current_task_id.and_then(|id| self.get(id))
    }

    /// Credits one finished focus session to the current task.
    ///
    /// Returns the updated task, or `None` if nothing is selected.
    pub fn increment_current(&mut self) -> Option<&Task> {
        let id = self.current_task_id?;
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed_pomodoros += 1;
        Some(task)
    }

    /// Returns all tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolves a full id or a unique prefix of its simple form.
    fn resolve(&self, id: &str) -> Result<Uuid, TaskError> {
        if let Ok(uuid) = Uuid::parse_str(id) {
            return self
                .get(uuid)
                .map(|t| t.id)
                .ok_or_else(|| TaskError::NotFound(id.to_string()));
        }

        let prefix = id.trim().to_ascii_lowercase().replace('-', "");
        if prefix.is_empty() {
            return Err(TaskError::NotFound(id.to_string()));
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.simple().to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task.id),
            (Some(_), Some(_)) => Err(TaskError::Ambiguous(id.to_string())),
            (None, _) => Err(TaskError::NotFound(id.to_string())),
        }
    }
}

// ============================================================================
// TaskStore
// ============================================================================

/// Persists a `TaskList` as JSON.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for `tasks.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(TASKS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the list. A missing file yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<TaskList, TaskError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Saves the list, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, list: &TaskList) -> Result<(), TaskError> {
        write_json(&self.path, list)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // TaskList Tests
    // ------------------------------------------------------------------------

    mod task_list_tests {
        use super::*;

        #[test]
        fn test_first_task_becomes_current() {
            let mut list = TaskList::new();
            let id = list.add("Write report").unwrap().id;
            list.add("Review PR").unwrap();

            assert_eq!(list.len(), 2);
            assert_eq!(list.current().unwrap().id, id);
        }

        #[test]
        fn test_add_replaces_dangling_selection() {
            let json = format!(r#"{{"tasks":[],"currentTaskId":"{}"}}"#, Uuid::new_v4());
            let mut list: TaskList = serde_json::from_str(&json).unwrap();
            assert!(list.current().is_none());

            let id = list.add("Write report").unwrap().id;

            assert_eq!(list.current().unwrap().id, id);
        }

        #[test]
        fn test_add_trims_title() {
            let mut list = TaskList::new();
            let task = list.add("  Plan sprint  ").unwrap();
            assert_eq!(task.title, "Plan sprint");
            assert_eq!(task.completed_pomodoros, 0);
        }

        #[test]
        fn test_add_rejects_empty_title() {
            let mut list = TaskList::new();
            assert!(matches!(list.add("   "), Err(TaskError::EmptyTitle)));
            assert!(list.is_empty());
        }

        #[test]
        fn test_add_rejects_long_title() {
            let mut list = TaskList::new();
            let title = "a".repeat(MAX_TITLE_LEN + 1);
            assert!(matches!(
                list.add(&title),
                Err(TaskError::TitleTooLong(101))
            ));
            assert!(list.add(&"a".repeat(MAX_TITLE_LEN)).is_ok());
        }

        #[test]
        fn test_title_limit_counts_characters() {
            let mut list = TaskList::new();
            assert!(list.add(&"é".repeat(MAX_TITLE_LEN)).is_ok());
        }

        #[test]
        fn test_remove_current_clears_selection() {
            let mut list = TaskList::new();
            let id = list.add("One").unwrap().id.to_string();
            list.add("Two").unwrap();

            let removed = list.remove(&id).unwrap();

            assert_eq!(removed.title, "One");
            assert!(list.current().is_none());
            assert_eq!(list.len(), 1);
        }

        #[test]
        fn test_remove_other_keeps_selection() {
            let mut list = TaskList::new();
            let first = list.add("One").unwrap().id;
            let second = list.add("Two").unwrap().id.to_string();

            list.remove(&second).unwrap();

            assert_eq!(list.current().unwrap().id, first);
        }

        #[test]
        fn test_select_by_prefix() {
            let mut list = TaskList::new();
            list.add("One").unwrap();
            let task = list.add("Two").unwrap().clone();

            let selected = list.select(&task.short_id()).unwrap();

            assert_eq!(selected.id, task.id);
            assert_eq!(list.current().unwrap().title, "Two");
        }

        #[test]
        fn test_select_unknown_is_error() {
            let mut list = TaskList::new();
            let id = list.add("One").unwrap().id;

            let result = list.select(&Uuid::new_v4().to_string());

            assert!(matches!(result, Err(TaskError::NotFound(_))));
            assert_eq!(list.current().unwrap().id, id);
        }

        #[test]
        fn test_select_empty_prefix_is_error() {
            let mut list = TaskList::new();
            list.add("One").unwrap();
            assert!(matches!(list.select(""), Err(TaskError::NotFound(_))));
        }

        #[test]
        fn test_increment_current() {
            let mut list = TaskList::new();
            list.add("One").unwrap();

            list.increment_current();
            let task = list.increment_current().unwrap();

            assert_eq!(task.completed_pomodoros, 2);
        }

        #[test]
        fn test_increment_without_selection_is_noop() {
            let mut list = TaskList::new();
            list.add("One").unwrap();
            list.clear_selection();

            assert!(list.increment_current().is_none());
            assert_eq!(list.tasks()[0].completed_pomodoros, 0);
        }
    }

    // ------------------------------------------------------------------------
    // TaskStore Tests
    // ------------------------------------------------------------------------

    mod task_store_tests {
        use super::*;
        use crate::store::StoreError;

        #[test]
        fn test_missing_file_is_empty_list() {
            let dir = tempfile::tempdir().unwrap();
            let store = TaskStore::in_dir(dir.path());
            assert!(store.load().unwrap().is_empty());
        }

        #[test]
        fn test_save_then_load() {
            let dir = tempfile::tempdir().unwrap();
            let store = TaskStore::in_dir(dir.path());
            let mut list = TaskList::new();
            list.add("Write report").unwrap();
            list.increment_current();

            store.save(&list).unwrap();
            let loaded = store.load().unwrap();

            assert_eq!(loaded, list);
            assert_eq!(loaded.current().unwrap().completed_pomodoros, 1);
        }

        #[test]
        fn test_file_format() {
            let dir = tempfile::tempdir().unwrap();
            let store = TaskStore::in_dir(dir.path());
            let mut list = TaskList::new();
            let id = list.add("Write report").unwrap().id;
            store.save(&list).unwrap();

            let content = std::fs::read_to_string(store.path()).unwrap();
            let value: serde_json::Value = serde_json::from_str(&content).unwrap();

            assert_eq!(value["currentTaskId"], id.to_string());
            assert_eq!(value["tasks"][0]["title"], "Write report");
            assert_eq!(value["tasks"][0]["completedPomodoros"], 0);
            assert!(value["tasks"][0]["createdAt"].is_string());
        }

        #[test]
        fn test_corrupt_file_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let store = TaskStore::in_dir(dir.path());
            std::fs::write(store.path(), "[1, 2").unwrap();

            let err = store.load().unwrap_err();
            assert!(matches!(err, TaskError::Store(StoreError::Parse { .. })));
        }
    }
}
