use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logger::SharedLogger;
use crate::model::Task;
use crate::repository::traits::TaskStore;

/// Stores the whole collection as one pretty-printed JSON array.
#[derive(Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
    logger: SharedLogger,
}

impl JsonFileStore {
    pub fn new(file_path: impl Into<PathBuf>, logger: SharedLogger) -> Self {
        Self {
            file_path: file_path.into(),
            logger,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::Io(e.into())
            } else {
                Error::invalid(format!(
                    "Invalid JSON format in {}: {}",
                    self.file_path.display(),
                    e
                ))
            }
        })
    }

    // Sibling temp file, then rename over the target.
    fn write_tasks(&self, tasks: &[Task]) -> io::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.file_path.with_extension("tmp");
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        fs::rename(&temp_path, &self.file_path)
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.file_path.exists() {
            self.logger.info(&format!(
                "Tasks file not found at {}. Creating new file.",
                self.file_path.display()
            ));
            self.save(&[])?;
            return Ok(Vec::new());
        }

        match self.read_tasks() {
            Ok(tasks) => {
                self.logger.info(&format!(
                    "Successfully read {} tasks from {}",
                    tasks.len(),
                    self.file_path.display()
                ));
                Ok(tasks)
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Error reading tasks from {}: {}",
                    self.file_path.display(),
                    e
                ));
                Err(e)
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        match self.write_tasks(tasks) {
            Ok(()) => {
                self.logger.info(&format!(
                    "Successfully wrote {} tasks to {}",
                    tasks.len(),
                    self.file_path.display()
                ));
                Ok(())
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Error writing tasks to {}: {}",
                    self.file_path.display(),
                    e
                ));
                Err(Error::Io(e))
            }
        }
    }
}
