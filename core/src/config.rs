use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

const DEFAULT_DIR_NAME: &str = ".tasktrack";
const DEFAULT_TASKS_FILE: &str = "tasks.json";
const DEFAULT_ACTIVITY_LOG: &str = "activity_log.txt";
const DEFAULT_UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub tasks_file: PathBuf,
    pub activity_log: PathBuf,
    pub upcoming_days: i64,
}

impl Config {
    /// Uses `base_dir` when given, otherwise `~/.tasktrack`. The directory is
    /// created if missing.
    pub fn resolve(base_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match base_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or_else(|| {
                    Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "Could not determine home directory",
                    ))
                })?
                .join(DEFAULT_DIR_NAME),
        };
        fs::create_dir_all(&data_dir)?;

        Ok(Self::in_dir(data_dir))
    }

    pub fn in_dir(data_dir: PathBuf) -> Self {
        Self {
            tasks_file: data_dir.join(DEFAULT_TASKS_FILE),
            activity_log: data_dir.join(DEFAULT_ACTIVITY_LOG),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_explicit_dir_creates_it() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");

        let config = Config::resolve(Some(dir.clone())).unwrap();

        assert!(dir.is_dir());
        assert_eq!(config.tasks_file, dir.join("tasks.json"));
        assert_eq!(config.activity_log, dir.join("activity_log.txt"));
        assert_eq!(config.upcoming_days, 7);
    }
}
