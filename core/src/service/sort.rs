//! Named sort strategies and the library-sort alternative.
//!
//! Every [`SortStrategy`] shares the same adjacent-exchange (bubble) pass and
//! differs only in its key. Swaps happen on strict inequality, so equal keys
//! never trade places and the exchange sort is stable.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::Error;
use crate::model::Task;

pub trait SortStrategy: Send + Sync {
    /// Lookup key, lowercase.
    fn name(&self) -> &'static str;

    /// Returns a reordered copy of `tasks`; the input is untouched.
    fn sort(&self, tasks: &[Task], ascending: bool) -> Vec<Task>;
}

pub struct SortByDueDate;
pub struct SortByPriority;
pub struct SortByAssignee;

impl SortStrategy for SortByDueDate {
    fn name(&self) -> &'static str {
        "duedate"
    }

    fn sort(&self, tasks: &[Task], ascending: bool) -> Vec<Task> {
        exchange_sort(tasks, ascending, compare_due_date)
    }
}

impl SortStrategy for SortByPriority {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn sort(&self, tasks: &[Task], ascending: bool) -> Vec<Task> {
        exchange_sort(tasks, ascending, |a, b| {
            a.priority.rank().cmp(&b.priority.rank())
        })
    }
}

impl SortStrategy for SortByAssignee {
    fn name(&self) -> &'static str {
        "assignee"
    }

    fn sort(&self, tasks: &[Task], ascending: bool) -> Vec<Task> {
        exchange_sort(tasks, ascending, compare_assignee)
    }
}

pub fn default_strategies() -> Vec<Box<dyn SortStrategy>> {
    vec![
        Box::new(SortByDueDate),
        Box::new(SortByPriority),
        Box::new(SortByAssignee),
    ]
}

fn exchange_sort<F>(tasks: &[Task], ascending: bool, compare: F) -> Vec<Task>
where
    F: Fn(&Task, &Task) -> Ordering,
{
    let mut sorted = tasks.to_vec();
    let len = sorted.len();

    for pass in 0..len.saturating_sub(1) {
        // The last `pass` slots already hold their final elements.
        for j in 0..len - pass - 1 {
            let order = compare(&sorted[j], &sorted[j + 1]);
            let should_swap = if ascending {
                order == Ordering::Greater
            } else {
                order == Ordering::Less
            };
            if should_swap {
                sorted.swap(j, j + 1);
            }
        }
    }

    sorted
}

fn compare_due_date(a: &Task, b: &Task) -> Ordering {
    a.due_date.cmp(&b.due_date)
}

/// Ordinal comparison after upper-casing both sides.
fn compare_assignee(a: &Task, b: &Task) -> Ordering {
    a.assignee
        .chars()
        .flat_map(char::to_uppercase)
        .cmp(b.assignee.chars().flat_map(char::to_uppercase))
}

/// Keys accepted by the library sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    DueDate,
    Priority,
    Assignee,
    CreatedDate,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duedate" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            "assignee" => Ok(SortField::Assignee),
            "createddate" => Ok(SortField::CreatedDate),
            _ => Err(Error::invalid(format!("Unknown sort field '{}'", s))),
        }
    }
}

/// Sorts with the standard library's stable sort. Descending order keeps
/// equal keys in their original relative order, same as ascending.
pub fn builtin_sort(tasks: &mut [Task], field: SortField, ascending: bool) {
    let compare: fn(&Task, &Task) -> Ordering = match field {
        SortField::DueDate => compare_due_date,
        SortField::Priority => |a: &Task, b: &Task| a.priority.cmp(&b.priority),
        SortField::Assignee => compare_assignee,
        SortField::CreatedDate => |a: &Task, b: &Task| a.created_date.cmp(&b.created_date),
    };

    if ascending {
        tasks.sort_by(compare);
    } else {
        tasks.sort_by(|a, b| compare(b, a));
    }
}
