use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Ordinal used by the priority sort: Low=1, Medium=2, High=3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "[HIGH]",
            Priority::Medium => "[MED]",
            Priority::Low => "[LOW]",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" | "1" => Ok(Priority::Low),
            "m" | "med" | "medium" | "2" => Ok(Priority::Medium),
            "h" | "high" | "3" => Ok(Priority::High),
            other => Err(Error::invalid(format!("Unknown priority '{}'", other))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    ToDo,
    InProgress,
    Done,
}

impl Default for Status {
    fn default() -> Self {
        Status::ToDo
    }
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "[TODO]",
            Status::InProgress => "[IN PROGRESS]",
            Status::Done => "[DONE]",
        }
    }

    /// ToDo -> InProgress -> Done -> ToDo
    pub fn next(self) -> Self {
        match self {
            Status::ToDo => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::ToDo,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "ToDo",
            Status::InProgress => "InProgress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "todo" | "t" => Ok(Status::ToDo),
            "inprogress" | "doing" | "p" => Ok(Status::InProgress),
            "done" | "d" => Ok(Status::Done),
            _ => Err(Error::invalid(format!("Unknown status '{}'", s.trim()))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,

    // None is the "not set" state; validation rejects it before insert/update.
    pub due_date: Option<DateTime<Utc>>,

    pub priority: Priority,
    pub status: Status,
    pub assignee: String,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
        priority: Priority,
        assignee: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            due_date: Some(due_date),
            priority,
            status: Status::ToDo,
            assignee: assignee.into(),
            created_date: Utc::now(),
            completed_date: None,
        }
    }

    /// Sets the status and keeps `completed_date` in step with it.
    pub fn update_status(&mut self, status: Status) {
        self.update_status_at(status, Utc::now());
    }

    pub fn update_status_at(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        if status == Status::Done {
            self.completed_date = Some(now);
        } else {
            self.completed_date = None;
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Time-of-day sensitive: a task due earlier today is already overdue.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.status != Status::Done && self.due_date.is_some_and(|due| due < now)
    }

    pub fn is_due_within(&self, days: i64) -> bool {
        self.is_due_within_on(days, Local::now().date_naive())
    }

    /// Compares local calendar days only.
    pub fn is_due_within_on(&self, days: i64, today: NaiveDate) -> bool {
        if self.status == Status::Done {
            return false;
        }
        match self.due_date {
            Some(due) => {
                let due_day = DateTime::<Local>::from(due).date_naive();
                let diff = (due_day - today).num_days();
                (0..=days).contains(&diff)
            }
            None => false,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self
            .due_date
            .map(|d| DateTime::<Local>::from(d).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "ID: {} | Title: {} | Due: {} | Priority: {} | Status: {} | Assignee: {}",
            self.id, self.title, due, self.priority, self.status, self.assignee
        )
    }
}
