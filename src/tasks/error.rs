//! Task error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by task list operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Title was empty after trimming
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// Title exceeded the character limit
    #[error("task title must be at most 100 characters (got {0})")]
    TitleTooLong(usize),

    /// No task has the given id (or unique id prefix)
    #[error("no task matches id {0}")]
    NotFound(String),

    /// More than one task matches the given id prefix
    #[error("id prefix {0} matches more than one task")]
    Ambiguous(String),

    /// Reading or writing the task file failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
