//! Credits finished focus sessions to the current task.

use tracing::{debug, info, warn};

use crate::engine::TimerEvent;

use super::{Task, TaskError, TaskStore};

/// Event consumer that keeps the task file in step with the engine.
///
/// The list is re-read on every credit so edits made by another process
/// (`pomodoro task ...`) between sessions are not overwritten.
#[derive(Debug, Clone)]
pub struct TaskTracker {
    store: TaskStore,
}

impl TaskTracker {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Handles one engine event.
    ///
    /// Returns the credited task when a focus session finished with a task
    /// selected. Storage failures are logged and swallowed.
    pub fn handle_event(&self, event: &TimerEvent) -> Option<Task> {
        let TimerEvent::FocusSessionCompleted { completed_cycles } = event else {
            return None;
        };
        debug!(completed_cycles, "crediting focus session");

        match self.credit_current() {
            Ok(Some(task)) => {
                info!(task = %task.title, pomodoros = task.completed_pomodoros, "task credited");
                Some(task)
            }
            Ok(None) => {
                debug!("no current task to credit");
                None
            }
            Err(e) => {
                warn!(error = %e, "could not update task file");
                None
            }
        }
    }

    fn credit_current(&self) -> Result<Option<Task>, TaskError> {
        let mut list = self.store.load()?;
        let Some(task) = list.increment_current().cloned() else {
            return Ok(None);
        };
        self.store.save(&list)?;
        Ok(Some(task))
    }
}
