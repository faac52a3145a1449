//! Parsing of `words key:value ...` task input shared by the CLI and the TUI.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{Priority, Status, Task};
use crate::time::parse_due_date;

pub const TASK_KEYS: [&str; 5] = ["assignee", "description", "due", "priority", "status"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
}

/// Splits arguments into title words and `key:value` pairs. Keys may be
/// abbreviated to any unambiguous prefix; a word whose prefix matches no key
/// stays part of the title.
pub fn parse_args(args: &[String]) -> Result<ParsedInput> {
    let mut title_words = Vec::new();
    let mut fields = Vec::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                match expand_key(key, &TASK_KEYS) {
                    Ok(full) => {
                        fields.push((full, value.to_string()));
                        continue;
                    }
                    Err(e) if is_ambiguous(key) => return Err(e),
                    Err(_) => {}
                }
            }
        }
        title_words.push(arg.as_str());
    }

    Ok(ParsedInput {
        title: title_words.join(" "),
        fields,
    })
}

pub fn expand_key(key: &str, candidates: &[&'static str]) -> Result<&'static str> {
    let key = key.to_lowercase();
    if let Some(exact) = candidates.iter().find(|c| **c == key) {
        return Ok(*exact);
    }

    let matches: Vec<&'static str> = candidates
        .iter()
        .copied()
        .filter(|c| c.starts_with(&key))
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(Error::invalid(format!("Unknown key: '{}'", key))),
        _ => Err(Error::invalid(format!(
            "Ambiguous key: '{}' matches {:?}",
            key, matches
        ))),
    }
}

fn is_ambiguous(key: &str) -> bool {
    let key = key.to_lowercase();
    TASK_KEYS.iter().filter(|c| c.starts_with(&key)).count() > 1
}

/// Field changes parsed from user input. `None` leaves a field as it is.
#[derive(Debug, Default, PartialEq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub status: Option<Status>,
}

impl TaskEdit {
    pub fn parse(args: &[String]) -> Result<Self> {
        let parsed = parse_args(args)?;
        let mut edit = TaskEdit {
            title: Some(parsed.title).filter(|t| !t.is_empty()),
            ..Default::default()
        };

        for (key, value) in parsed.fields {
            match key {
                "assignee" => edit.assignee = Some(value),
                "description" => edit.description = Some(value),
                "due" => edit.due_date = Some(parse_due_date(&value)?),
                "priority" => edit.priority = Some(value.parse()?),
                "status" => edit.status = Some(value.parse()?),
                _ => {}
            }
        }
        Ok(edit)
    }

    /// Builds a new task. Missing title, assignee or due date are left blank
    /// for validation to reject.
    pub fn into_task(self, id: i64) -> Task {
        let mut task = Task {
            id,
            title: String::new(),
            description: String::new(),
            due_date: None,
            priority: Priority::default(),
            status: Status::ToDo,
            assignee: String::new(),
            created_date: Utc::now(),
            completed_date: None,
        };
        self.apply(&mut task);
        task
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(status) = self.status {
            task.update_status(status);
        }
    }
}
