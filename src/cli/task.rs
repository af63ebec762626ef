//! Task CLI commands
//!
//! Read commands load the list once. Write commands run load, one domain
//! operation and save inside [`TaskStore::update`], so concurrent `todo`
//! processes cannot lose each other's changes. Unlike the library, writes to
//! an unknown id are reported as errors here.

use anyhow::Result;

use super::output::Output;
use crate::domain::{Status, Task, TaskList};
use crate::storage::TaskStore;

/// Status filter accepted by `todo list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl From<StatusFilter> for Status {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Completed => Status::Completed,
            StatusFilter::Pending => Status::Pending,
        }
    }
}

fn load(output: &Output, store: &TaskStore) -> Result<TaskList> {
    let list = store.load()?;
    output.verbose_ctx(
        "store",
        &format!("Loaded {} tasks (next id {})", list.count(), list.next_id()),
    );
    Ok(list)
}

/// Applies `f` to the stored list and saves the result under the write lock
fn update<T>(
    output: &Output,
    store: &TaskStore,
    f: impl FnOnce(&TaskList) -> Result<(TaskList, T)>,
) -> Result<T> {
    store.update(|list| {
        output.verbose_ctx(
            "store",
            &format!("Loaded {} tasks (next id {})", list.count(), list.next_id()),
        );
        let (next, out) = f(list)?;
        output.verbose_ctx("store", &format!("Saving {} tasks", next.count()));
        Ok((next, out))
    })
}

fn checkbox(task: &Task) -> &'static str {
    if task.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

fn print_table(tasks: &[&Task]) {
    println!("{:<6} {:<5} {:<8} DESCRIPTION", "ID", "DONE", "PRIORITY");
    println!("{}", "-".repeat(60));

    for task in tasks {
        let tags = if task.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", task.tags.join(" #"))
        };
        println!(
            "{:<6} {:<5} {:<8} {}{}",
            task.id,
            checkbox(task),
            task.priority,
            task.description,
            tags
        );
    }
}

pub fn add(output: &Output, store: &TaskStore, description: &str) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        anyhow::bail!("Task description cannot be empty");
    }

    let task = update(output, store, |list| Ok(list.add_task(description)))?;
    output.verbose_ctx("add", &format!("Assigned id {}", task.id));

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Added task {}: {}", task.id, task.description));
    }

    Ok(())
}

pub fn list(output: &Output, store: &TaskStore, filter: Option<StatusFilter>) -> Result<()> {
    let list = load(output, store)?;

    let tasks = match filter {
        Some(filter) => {
            let status = Status::from(filter);
            output.verbose_ctx("list", &format!("Filtering by status: {}", status));
            list.filter_by_status(status)
        }
        None => list.all(),
    };

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        match filter {
            Some(filter) => println!("No {} tasks", Status::from(filter)),
            None => println!("No tasks"),
        }
    } else {
        print_table(&tasks);
    }

    Ok(())
}

pub fn show(output: &Output, store: &TaskStore, id: u64) -> Result<()> {
    let list = load(output, store)?;
    let task = list.find(id)?;

    if output.is_json() {
        output.data(task);
    } else {
        println!("Task: {}", task.id);
        println!("Description: {}", task.description);
        println!(
            "Status: {}",
            if task.completed { "completed" } else { "pending" }
        );
        println!("Priority: {}", task.priority);
        println!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
        if !task.tags.is_empty() {
            println!("Tags: {}", task.tags.join(", "));
        }
    }

    Ok(())
}

pub fn complete(output: &Output, store: &TaskStore, id: u64) -> Result<()> {
    let task = update(output, store, |list| {
        list.find(id)?;
        let next = list.complete(id);
        let task = next.find(id)?.clone();
        Ok((next, task))
    })?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Completed task {}", id));
    }

    Ok(())
}

pub fn uncomplete(output: &Output, store: &TaskStore, id: u64) -> Result<()> {
    let task = update(output, store, |list| {
        list.find(id)?;
        let next = list.uncomplete(id);
        let task = next.find(id)?.clone();
        Ok((next, task))
    })?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Reopened task {}", id));
    }

    Ok(())
}

pub fn delete(output: &Output, store: &TaskStore, id: u64) -> Result<()> {
    update(output, store, |list| {
        list.find(id)?;
        Ok((list.delete(id), ()))
    })?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "deleted": true,
        }));
    } else {
        output.success(&format!("Deleted task {}", id));
    }

    Ok(())
}

pub fn set_priority(output: &Output, store: &TaskStore, id: u64, level: &str) -> Result<()> {
    let task = update(output, store, |list| {
        let next = list.set_priority(id, level)?;
        let task = next.find(id)?.clone();
        Ok((next, task))
    })?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Set priority of task {} to {}", id, task.priority));
    }

    Ok(())
}

pub fn add_tag(output: &Output, store: &TaskStore, id: u64, tag: &str) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
        anyhow::bail!("Tag cannot be empty");
    }

    let task = update(output, store, |list| {
        let next = list.add_tag(id, tag)?;
        let task = next.find(id)?.clone();
        Ok((next, task))
    })?;

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Tagged task {} with {}", id, tag));
    }

    Ok(())
}

pub fn stats(output: &Output, store: &TaskStore) -> Result<()> {
    let list = load(output, store)?;

    let total = list.count();
    let completed = list.count_completed();
    let pending = list.count_pending();

    if output.is_json() {
        output.data(&serde_json::json!({
            "total": total,
            "completed": completed,
            "pending": pending,
        }));
    } else {
        println!("Total:     {}", total);
        println!("Completed: {}", completed);
        println!("Pending:   {}", pending);
    }

    Ok(())
}
