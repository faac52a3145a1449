pub mod file;
pub mod memory;
pub mod task_repository;
pub mod traits;

// Re-export
pub use file::JsonFileStore;
pub use memory::InMemoryTaskStore;
pub use task_repository::TaskRepository;
pub use traits::TaskStore;
