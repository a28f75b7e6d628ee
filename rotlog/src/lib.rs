//! # rotlog
//!
//! Логгирование в JSON-файлы `app_<UTC>.log` с ротацией по стратегии
//! и периодической очисткой старых файлов.

use serde::Serialize;
use std::fmt;

pub mod cleanup;
pub mod error;
pub mod file_info;
pub mod file_logger;
pub mod rotation;
pub mod system;

pub use cleanup::{clean_once, schedule_cleanup, CleanupStrategy, RemoveAll, RemoveCreatedBefore};
pub use error::{LogError, StrategyError};
pub use file_info::FileRecord;
pub use file_logger::{ErrorCallback, FileLogger, DEFAULT_LOG_DIR};
pub use rotation::{NeverRotate, RotationStrategy, TimeBased};
pub use system::SystemLogger;

// ===== Уровни логгирования =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Critical => "CRITICAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Общий интерфейс логгеров =====

/// Любой бэкенд: файловый или системный.
///
/// Обязателен только `printf`, остальные методы сводятся к нему с
/// соответствующим уровнем, чтобы сообщение форматировалось одинаково
/// независимо от точки входа.
pub trait Logger: Send + Sync {
    fn printf(&self, level: LogLevel, args: fmt::Arguments<'_>);

    fn criticalf(&self, args: fmt::Arguments<'_>) {
        self.printf(LogLevel::Critical, args);
    }

    fn errorf(&self, args: fmt::Arguments<'_>) {
        self.printf(LogLevel::Error, args);
    }

    fn warningf(&self, args: fmt::Arguments<'_>) {
        self.printf(LogLevel::Warning, args);
    }

    fn infof(&self, args: fmt::Arguments<'_>) {
        self.printf(LogLevel::Info, args);
    }

    fn debugf(&self, args: fmt::Arguments<'_>) {
        self.printf(LogLevel::Debug, args);
    }
}

// ===== Макросы =====

#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.printf($level, std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.criticalf(std::format_args!($($arg)*));
    }};
}
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.errorf(std::format_args!($($arg)*));
    }};
}
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.warningf(std::format_args!($($arg)*));
    }};
}
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.infof(std::format_args!($($arg)*));
    }};
}
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)*) => {{
        use $crate::Logger as _;
        $logger.debugf(std::format_args!($($arg)*));
    }};
}
