pub mod sort;
pub mod task_manager;
