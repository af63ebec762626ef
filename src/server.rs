//! Single-writer owner for a shared task list
//!
//! [`TaskServer`] runs a thread that holds the current [`TaskList`] and
//! applies requests one at a time, replacing the held value after each
//! write. Handles are cheap to clone and can be shared across threads;
//! every call is a request/response round trip over `mpsc` channels.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::Result;
use thiserror::Error;

use crate::domain::{NotFoundError, Status, Task, TaskList};
use crate::storage::TaskStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerError {
    #[error("Task server has stopped")]
    Stopped,

    #[error("Failed to persist task list: {0}")]
    Store(String),
}

type Reply<T> = mpsc::Sender<T>;

enum Request {
    Add(String, Reply<Result<Task, ServerError>>),
    Complete(u64, Reply<Result<(), ServerError>>),
    Uncomplete(u64, Reply<Result<(), ServerError>>),
    Delete(u64, Reply<Result<(), ServerError>>),
    Find(u64, Reply<Result<Task, NotFoundError>>),
    All(Reply<Vec<Task>>),
    Filter(Status, Reply<Vec<Task>>),
    Snapshot(Reply<TaskList>),
    Shutdown,
}

/// Owner thread state
struct Owner {
    list: TaskList,
    store: Option<TaskStore>,
}

impl Owner {
    /// Swaps in `next` after persisting it; on a failed save the old value stays
    fn commit(&mut self, next: TaskList) -> Result<(), ServerError> {
        if let Some(store) = &self.store {
            store
                .save(&next)
                .map_err(|e| ServerError::Store(format!("{:#}", e)))?;
        }
        self.list = next;
        Ok(())
    }

    fn run(mut self, rx: mpsc::Receiver<Request>) {
        // A send error only means the caller gave up waiting
        while let Ok(request) = rx.recv() {
            match request {
                Request::Add(description, reply) => {
                    let (next, task) = self.list.add_task(description);
                    let _ = reply.send(self.commit(next).map(|_| task));
                }
                Request::Complete(id, reply) => {
                    let next = self.list.complete(id);
                    let _ = reply.send(self.commit(next));
                }
                Request::Uncomplete(id, reply) => {
                    let next = self.list.uncomplete(id);
                    let _ = reply.send(self.commit(next));
                }
                Request::Delete(id, reply) => {
                    let next = self.list.delete(id);
                    let _ = reply.send(self.commit(next));
                }
                Request::Find(id, reply) => {
                    let _ = reply.send(self.list.find(id).cloned());
                }
                Request::All(reply) => {
                    let _ = reply.send(self.list.all().into_iter().cloned().collect());
                }
                Request::Filter(status, reply) => {
                    let tasks = self.list.filter_by_status(status);
                    let _ = reply.send(tasks.into_iter().cloned().collect());
                }
                Request::Snapshot(reply) => {
                    let _ = reply.send(self.list.clone());
                }
                Request::Shutdown => break,
            }
        }
    }
}

/// Handle to a running task server
#[derive(Clone)]
pub struct TaskServer {
    tx: mpsc::Sender<Request>,
}

impl TaskServer {
    /// Starts an owner thread holding `initial`
    pub fn spawn(initial: TaskList) -> Self {
        Self::start(initial, None).0
    }

    /// Loads the list from `store` and saves after every write
    pub fn with_store(store: TaskStore) -> Result<Self> {
        let initial = store.load()?;
        Ok(Self::start(initial, Some(store)).0)
    }

    /// Like [`TaskServer::spawn`], also returning the owner thread's handle
    pub fn spawn_joinable(initial: TaskList) -> (Self, JoinHandle<()>) {
        Self::start(initial, None)
    }

    fn start(list: TaskList, store: Option<TaskStore>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel();
        let owner = Owner { list, store };
        let handle = thread::spawn(move || owner.run(rx));
        (Self { tx }, handle)
    }

    fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Request) -> Result<T, ServerError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(make(reply_tx))
            .map_err(|_| ServerError::Stopped)?;
        reply_rx.recv().map_err(|_| ServerError::Stopped)
    }

    /// Adds a task and returns it
    pub fn add(&self, description: impl Into<String>) -> Result<Task, ServerError> {
        let description = description.into();
        self.call(|reply| Request::Add(description, reply))?
    }

    pub fn complete(&self, id: u64) -> Result<(), ServerError> {
        self.call(|reply| Request::Complete(id, reply))?
    }

    pub fn uncomplete(&self, id: u64) -> Result<(), ServerError> {
        self.call(|reply| Request::Uncomplete(id, reply))?
    }

    pub fn delete(&self, id: u64) -> Result<(), ServerError> {
        self.call(|reply| Request::Delete(id, reply))?
    }

    /// Looks up a task; the outer error means the server is gone
    pub fn find(&self, id: u64) -> Result<Result<Task, NotFoundError>, ServerError> {
        self.call(|reply| Request::Find(id, reply))
    }

    /// Every task, oldest first
    pub fn all(&self) -> Result<Vec<Task>, ServerError> {
        self.call(Request::All)
    }

    pub fn filter_by_status(&self, status: Status) -> Result<Vec<Task>, ServerError> {
        self.call(|reply| Request::Filter(status, reply))
    }

    pub fn count(&self) -> Result<usize, ServerError> {
        Ok(self.snapshot()?.count())
    }

    pub fn count_completed(&self) -> Result<usize, ServerError> {
        Ok(self.snapshot()?.count_completed())
    }

    /// The current list value
    pub fn snapshot(&self) -> Result<TaskList, ServerError> {
        self.call(Request::Snapshot)
    }

    /// Asks the owner thread to exit after pending requests
    pub fn shutdown(&self) {
        let _ = self.tx.send(Request::Shutdown);
    }
}
