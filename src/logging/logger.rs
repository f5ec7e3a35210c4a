//! The `Logger` capability handed out by a [`LogFactory`](super::LogFactory).

use std::fmt;
use std::sync::Arc;

/// Severity of a log line, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        };
        f.write_str(name)
    }
}

/// A named logger instance.
///
/// Backends only implement [`name`](Logger::name) and [`log`](Logger::log);
/// the per-level helpers are provided.
pub trait Logger: Send + Sync + fmt::Debug {
    /// The category this logger was created for.
    fn name(&self) -> &str;

    fn log(&self, level: LogLevel, message: &str);

    fn is_enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

pub type SharedLogger = Arc<dyn Logger>;
