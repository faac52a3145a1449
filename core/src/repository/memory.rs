use std::cell::{Cell, RefCell};

use crate::error::Result;
use crate::model::Task;
use crate::repository::traits::TaskStore;

/// Keeps the last saved collection in memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RefCell<Vec<Task>>,
    saves: Cell<usize>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
            saves: Cell::new(0),
        }
    }

    /// Snapshot of what was last saved.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
