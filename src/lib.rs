//! todo-cli - a small task list
//!
//! The [`domain`] module is a pure value library: every operation on a
//! [`Task`] or [`TaskList`] returns a new value and leaves its input as it
//! was. [`storage`] persists lists as JSON, [`server`] serializes access from
//! several threads, and [`cli`] is the `todo` front end.

pub mod domain;
pub mod storage;
pub mod server;
pub mod cli;

pub use domain::{NotFoundError, Priority, Status, Task, TaskError, TaskList, ValidationError};
