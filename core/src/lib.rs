pub mod config;
pub mod error;
pub mod input;
pub mod logger;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use input::{expand_key, parse_args, ParsedInput, TaskEdit};
pub use logger::{Logger, NullLogger, SharedLogger, TracingLogger};
pub use model::task::{Priority, Status, Task};
pub use repository::{InMemoryTaskStore, JsonFileStore, TaskRepository, TaskStore};
pub use service::sort::{SortField, SortStrategy};
pub use service::task_manager::{AssigneeGroup, TaskManager};
pub use time::parse_due_date;
pub use validation::{validate_id, validate_task};

/// Builds the file-backed manager the binaries use.
pub fn open_file_manager(config: &Config, logger: SharedLogger) -> TaskManager<JsonFileStore> {
    let store = JsonFileStore::new(&config.tasks_file, logger.clone());
    let repo = TaskRepository::new(store, logger.clone());
    TaskManager::new(repo, logger)
}
