//! Task collection
//!
//! Owns id assignment and exposes create/read/update/delete/filter
//! operations. Like [`Task`], a [`TaskList`] is never changed in place:
//! each write returns a new list and the receiver stays as it was.
//!
//! Tasks are stored most-recent-first. [`TaskList::all`] reverses that to
//! oldest-first, while [`TaskList::filter_by_status`] keeps storage order.

use std::fmt;

use thiserror::Error;

use super::task::{Task, ValidationError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Task not found: {0}")]
pub struct NotFoundError(pub u64);

/// Either failure a collection update can produce
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Completion filter for [`TaskList::filter_by_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Status::Completed => task.completed,
            Status::Pending => !task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Pending => "pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// All tasks plus the next id to hand out
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    /// Most recently created first
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    /// Creates an empty list whose first task will get id 1
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a list from stored parts
    ///
    /// `tasks` is given oldest-first. Callers are responsible for `next_id`
    /// being greater than every task id.
    pub(crate) fn from_parts(mut tasks: Vec<Task>, next_id: u64) -> Self {
        tasks.reverse();
        Self { tasks, next_id }
    }

    /// The id the next added task will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Returns a list with a new pending task for `description`
    ///
    /// Descriptions are not validated here; an empty string is accepted.
    pub fn add(&self, description: impl Into<String>) -> Self {
        self.add_task(description).0
    }

    /// Like [`TaskList::add`], also returning the created task
    pub fn add_task(&self, description: impl Into<String>) -> (Self, Task) {
        let task = Task::new(self.next_id, description);
        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(task.clone());
        tasks.extend(self.tasks.iter().cloned());

        let list = Self {
            tasks,
            next_id: self.next_id + 1,
        };
        (list, task)
    }

    /// Every task, oldest-created first
    pub fn all(&self) -> Vec<&Task> {
        self.tasks.iter().rev().collect()
    }

    /// The most recently added task, if any
    pub fn last(&self) -> Option<&Task> {
        self.tasks.first()
    }

    pub fn find(&self, id: u64) -> Result<&Task, NotFoundError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(NotFoundError(id))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Marks a task completed; an unknown id leaves the list unchanged
    pub fn complete(&self, id: u64) -> Self {
        self.map_task(id, Task::complete)
    }

    /// Marks a task pending again; an unknown id leaves the list unchanged
    pub fn uncomplete(&self, id: u64) -> Self {
        self.map_task(id, Task::uncomplete)
    }

    /// Removes a task; an unknown id leaves the list unchanged
    pub fn delete(&self, id: u64) -> Self {
        Self {
            tasks: self.tasks.iter().filter(|t| t.id != id).cloned().collect(),
            next_id: self.next_id,
        }
    }

    /// Sets the priority of a task from its textual name
    pub fn set_priority(&self, id: u64, value: &str) -> Result<Self, TaskError> {
        let updated = self.find(id)?.set_priority(value)?;
        Ok(self.replace(updated))
    }

    /// Prepends a tag to a task
    pub fn add_tag(&self, id: u64, tag: impl Into<String>) -> Result<Self, NotFoundError> {
        let updated = self.find(id)?.add_tag(tag);
        Ok(self.replace(updated))
    }

    /// Tasks whose completion matches `status`, most-recent-first
    pub fn filter_by_status(&self, status: Status) -> Vec<&Task> {
        self.tasks.iter().filter(|t| status.matches(t)).collect()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn count_completed(&self) -> usize {
        self.filter_by_status(Status::Completed).len()
    }

    pub fn count_pending(&self) -> usize {
        self.filter_by_status(Status::Pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn map_task(&self, id: u64, f: impl Fn(&Task) -> Task) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .map(|t| if t.id == id { f(t) } else { t.clone() })
                .collect(),
            next_id: self.next_id,
        }
    }

    fn replace(&self, task: Task) -> Self {
        self.map_task(task.id, |_| task.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use proptest::prelude::*;

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn new_list_is_empty() {
        let list = TaskList::new();

        assert!(list.is_empty());
        assert_eq!(list.count(), 0);
        assert_eq!(list.next_id(), 1);
        assert!(list.all().is_empty());
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let list = TaskList::new().add("Buy milk").add("Write report");

        assert_eq!(list.count(), 2);
        assert_eq!(list.next_id(), 3);
        assert_eq!(list.find(1).unwrap().description, "Buy milk");
        assert_eq!(list.find(2).unwrap().description, "Write report");
        assert_eq!(list.last().unwrap().id, 2);
    }

    #[test]
    fn add_task_returns_the_new_task() {
        let (list, task) = TaskList::new().add("a").add_task("b");

        assert_eq!(task.id, 2);
        assert_eq!(list.find(2), Ok(&task));
    }

    #[test]
    fn add_does_not_change_receiver() {
        let before = TaskList::new().add("Buy milk");
        let after = before.add("Write report");

        assert_eq!(before.count(), 1);
        assert_eq!(before.next_id(), 2);
        assert_eq!(after.count(), 2);
    }

    #[test]
    fn add_accepts_empty_description() {
        let list = TaskList::new().add("");
        assert_eq!(list.find(1).unwrap().description, "");
    }

    #[test]
    fn find_missing_is_not_found() {
        let list = TaskList::new().add("Buy milk");
        assert_eq!(list.find(42), Err(NotFoundError(42)));
        assert!(!list.contains(42));
        assert!(list.contains(1));
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let list = TaskList::new().add("a").add("b").delete(2).add("c");

        assert_eq!(ids(&list.all()), vec![1, 3]);
        assert_eq!(list.next_id(), 4);
    }

    #[test]
    fn delete_leaves_other_tasks_alone() {
        let list = TaskList::new().add("a").add("b").add("c").complete(3);
        let deleted = list.delete(2);

        assert_eq!(deleted.find(1), list.find(1));
        assert_eq!(deleted.find(3), list.find(3));
        assert_eq!(deleted.next_id(), list.next_id());
    }

    #[test]
    fn all_is_oldest_first_but_filter_is_newest_first() {
        let list = TaskList::new().add("a").add("b").add("c").complete(1).complete(3);

        assert_eq!(ids(&list.all()), vec![1, 2, 3]);
        assert_eq!(ids(&list.filter_by_status(Status::Completed)), vec![3, 1]);
        assert_eq!(ids(&list.filter_by_status(Status::Pending)), vec![2]);
    }

    #[test]
    fn uncomplete_reopens_task() {
        let list = TaskList::new().add("a").complete(1).uncomplete(1);

        assert!(!list.find(1).unwrap().completed);
        assert_eq!(list.count_pending(), 1);
        assert_eq!(TaskList::new().uncomplete(5), TaskList::new());
    }

    #[test]
    fn set_priority_through_list() {
        let list = TaskList::new().add("a");

        let updated = list.set_priority(1, "high").unwrap();
        assert_eq!(updated.find(1).unwrap().priority, Priority::High);
        assert_eq!(list.find(1).unwrap().priority, Priority::Medium);

        assert_eq!(
            list.set_priority(1, "urgent"),
            Err(TaskError::Validation(ValidationError::InvalidPriority(
                "urgent".to_string()
            )))
        );
        assert_eq!(
            list.set_priority(9, "low"),
            Err(TaskError::NotFound(NotFoundError(9)))
        );
    }

    #[test]
    fn add_tag_through_list() {
        let list = TaskList::new().add("a").add("b");

        let tagged = list.add_tag(2, "work").unwrap().add_tag(2, "urgent").unwrap();
        assert_eq!(tagged.find(2).unwrap().tags, vec!["urgent", "work"]);
        assert!(tagged.find(1).unwrap().tags.is_empty());
        assert_eq!(list.add_tag(9, "x"), Err(NotFoundError(9)));
    }

    #[test]
    fn status_displays_lowercase_name() {
        assert_eq!(Status::Completed.to_string(), "completed");
        assert_eq!(format!("{:<9}|", Status::Pending), "pending  |");
    }

    #[test]
    fn tutorial_scenario() {
        let list = TaskList::new().add("Buy milk");
        let milk = list.find(1).unwrap();
        assert_eq!(milk.priority, Priority::Medium);
        assert!(!milk.completed);

        let list = list.add("Write report");
        assert_eq!(list.find(2).unwrap().id, 2);

        let list = list.complete(1);
        let all = list.all();
        assert_eq!(ids(&all), vec![1, 2]);
        assert!(all[0].completed);
        assert!(!all[1].completed);
        assert_eq!(list.count_completed(), 1);

        let list = list.delete(2);
        assert_eq!(list.count(), 1);
    }

    /// Builds a list from a script of operations
    fn build(ops: &[(u8, u64)]) -> TaskList {
        ops.iter().fold(TaskList::new(), |list, (op, id)| match op % 4 {
            0 | 1 => list.add(format!("task {}", id)),
            2 => list.complete(*id),
            _ => list.delete(*id),
        })
    }

    fn ops() -> impl Strategy<Value = Vec<(u8, u64)>> {
        prop::collection::vec((any::<u8>(), 1u64..20), 0..40)
    }

    proptest! {
        #[test]
        fn add_grows_count_by_one(script in ops(), desc in ".*") {
            let list = build(&script);
            let added = list.add(desc.clone());

            prop_assert_eq!(added.count(), list.count() + 1);
            prop_assert_eq!(added.next_id(), list.next_id() + 1);

            let task = added.find(list.next_id()).unwrap();
            prop_assert_eq!(&task.description, &desc);
        }

        #[test]
        fn every_id_is_below_next_id(script in ops()) {
            let list = build(&script);
            prop_assert!(list.all().iter().all(|t| t.id < list.next_id()));
        }

        #[test]
        fn complete_is_idempotent(script in ops(), id in 1u64..20) {
            let list = build(&script);
            let once = list.complete(id);
            prop_assert_eq!(once.complete(id), once);
        }

        #[test]
        fn writes_on_missing_id_are_no_ops(script in ops()) {
            let list = build(&script);
            prop_assert_eq!(list.delete(9999), list.clone());
            prop_assert_eq!(list.complete(9999), list.clone());
        }

        #[test]
        fn find_returns_added_tasks(descs in prop::collection::vec(".*", 0..10)) {
            let list = descs.iter().fold(TaskList::new(), |l, d| l.add(d.as_str()));

            for (i, desc) in descs.iter().enumerate() {
                let task = list.find(i as u64 + 1).unwrap();
                prop_assert_eq!(task.id, i as u64 + 1);
                prop_assert_eq!(&task.description, desc);
            }
        }

        #[test]
        fn statuses_partition_the_list(script in ops()) {
            let list = build(&script);
            let completed = list.filter_by_status(Status::Completed).len();
            let pending = list.filter_by_status(Status::Pending).len();

            prop_assert_eq!(completed + pending, list.count());
            prop_assert_eq!(list.count_completed(), list.all().iter().filter(|t| t.completed).count());
        }
    }
}
