pub mod task;

pub use task::{Priority, Status, Task};
