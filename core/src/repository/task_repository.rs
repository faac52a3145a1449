use crate::error::{Error, Result};
use crate::logger::SharedLogger;
use crate::model::Task;
use crate::repository::traits::TaskStore;

/// Owns the authoritative in-memory collection and writes it through to the
/// store after every mutation.
///
/// A failed save is returned to the caller but the in-memory change is kept,
/// so memory may be ahead of storage until the next successful save.
pub struct TaskRepository<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
    logger: SharedLogger,
}

impl<S: TaskStore> TaskRepository<S> {
    /// Loads the collection from `store`. Load failures are logged and the
    /// repository starts empty.
    pub fn new(store: S, logger: SharedLogger) -> Self {
        let tasks = match store.load() {
            Ok(tasks) => {
                logger.info(&format!("Loaded {} tasks from repository", tasks.len()));
                tasks
            }
            Err(e) => {
                logger.error(&format!("Failed to load tasks: {}", e));
                Vec::new()
            }
        };

        Self {
            store,
            tasks,
            logger,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(Error::TaskNotFound(id))
    }

    /// Appends without checking id uniqueness; callers allocate ids.
    pub fn add(&mut self, task: Task) -> Result<()> {
        let id = task.id;
        self.tasks.push(task);
        self.save_tasks()?;
        self.logger.info(&format!("Added task with ID {}", id));
        Ok(())
    }

    /// Replaces the whole stored record matching `task.id`.
    pub fn update(&mut self, task: Task) -> Result<()> {
        let id = task.id;
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        self.tasks[pos] = task;
        self.save_tasks()?;
        self.logger.info(&format!("Updated task with ID {}", id));
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        self.tasks.remove(pos);
        self.save_tasks()?;
        self.logger.info(&format!("Deleted task with ID {}", id));
        Ok(())
    }

    /// Substring search over id, title, assignee and status name. A blank term
    /// returns everything.
    pub fn search(&self, term: &str) -> Vec<Task> {
        if term.trim().is_empty() {
            return self.get_all();
        }

        let lower = term.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| {
                task.id.to_string().contains(term)
                    || task.title.to_lowercase().contains(&lower)
                    || task.assignee.to_lowercase().contains(&lower)
                    || task.status.to_string().to_lowercase().contains(&lower)
            })
            .cloned()
            .collect()
    }

    fn save_tasks(&self) -> Result<()> {
        self.store.save(&self.tasks).map_err(|e| {
            self.logger.error(&format!("Failed to save tasks: {}", e));
            e
        })
    }
}
