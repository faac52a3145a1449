use std::cell::Cell;
use std::io;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::model::{Priority, Task};
use crate::repository::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn shared() -> Arc<RecordingLogger> {
        Arc::new(RecordingLogger::default())
    }

    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.iter().any(|(l, m)| *l == level && m.contains(needle)))
            .unwrap_or(false)
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Store whose load and save can be made to fail on demand.
#[derive(Default)]
pub struct FlakyStore {
    pub fail_load: bool,
    pub fail_save: Cell<bool>,
    pub initial: Vec<Task>,
}

impl TaskStore for FlakyStore {
    fn load(&self) -> Result<Vec<Task>> {
        if self.fail_load {
            return Err(Error::invalid("Invalid JSON format in tasks.json"));
        }
        Ok(self.initial.clone())
    }

    fn save(&self, _tasks: &[Task]) -> Result<()> {
        if self.fail_save.get() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn task(id: i64, title: &str, assignee: &str, priority: Priority) -> Task {
    Task::new(
        id,
        title,
        "",
        Utc::now() + Duration::days(id + 1),
        priority,
        assignee,
    )
}
