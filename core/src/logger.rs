//! Diagnostics sink shared by the store, repository and manager.
//!
//! One logger is built at startup and handed to every component as an
//! `Arc<dyn Logger>`. Implementations must swallow their own failures.

use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

pub type SharedLogger = Arc<dyn Logger>;

/// Forwards to `tracing`; where the events end up is decided by whichever
/// subscriber the binary installs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn shared() -> SharedLogger {
        Arc::new(TracingLogger)
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "tasktrack", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "tasktrack", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "tasktrack", "{}", message);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl NullLogger {
    pub fn shared() -> SharedLogger {
        Arc::new(NullLogger)
    }
}

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
