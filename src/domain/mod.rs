//! Domain models for the task list
//!
//! Contains the core logic without any I/O concerns.

mod task;
mod collection;

pub use task::{Priority, Task, ValidationError};
pub use collection::{NotFoundError, Status, TaskError, TaskList};
