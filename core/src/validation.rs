//! Field checks run before a task reaches the repository.

use chrono::{DateTime, Local, NaiveDate};

use crate::error::{Error, Result};
use crate::model::Task;

/// Rejects tasks with a blank title or assignee, an unset due date, or a due
/// date on a calendar day before today.
pub fn validate_task(task: &Task) -> Result<()> {
    validate_task_on(task, Local::now().date_naive())
}

pub fn validate_task_on(task: &Task, today: NaiveDate) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(Error::invalid("Task title cannot be null or empty."));
    }

    if task.assignee.trim().is_empty() {
        return Err(Error::invalid("Task assignee cannot be null or empty."));
    }

    let due = task
        .due_date
        .ok_or_else(|| Error::invalid("Task due date is not set."))?;

    // Day granularity: a task due at 00:00 today is still valid at 23:59.
    if DateTime::<Local>::from(due).date_naive() < today {
        return Err(Error::invalid("Task due date cannot be in the past."));
    }

    Ok(())
}

pub fn validate_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(Error::invalid("Task ID must be a positive integer."));
    }
    Ok(())
}
