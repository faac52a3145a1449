use crate::error::Result;
use crate::model::Task;

/// Whole-collection persistence used by [`TaskRepository`](super::TaskRepository).
pub trait TaskStore {
    /// Returns the persisted tasks in stored order. A missing document is
    /// created empty rather than reported as an error.
    fn load(&self) -> Result<Vec<Task>>;

    /// Replaces the persisted document with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load(&self) -> Result<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        (**self).save(tasks)
    }
}
