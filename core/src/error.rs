//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A task or id failed validation, or the persisted document could not be decoded.
    #[error("Invalid task data: {0}")]
    InvalidTaskData(String),

    #[error("Task with ID {0} not found.")]
    TaskNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidTaskData(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TaskNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
