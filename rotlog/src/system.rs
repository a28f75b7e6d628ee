// ===== Системный логгер (платформозависимо) =====
//
// На Linux пишет в syslog, в остальных случаях (и если syslog недоступен)
// печатает в stderr с префиксом приложения.

use std::fmt;
#[cfg(target_os = "linux")]
use std::sync::{Mutex, PoisonError};

use crate::{LogLevel, Logger};

#[cfg(target_os = "linux")]
type Syslog = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

pub struct SystemLogger {
    app_name: String,
    #[cfg(target_os = "linux")]
    syslog: Option<Mutex<Syslog>>,
}

impl SystemLogger {
    pub fn new(app_name: &str) -> Self {
        SystemLogger {
            app_name: app_name.to_owned(),
            #[cfg(target_os = "linux")]
            syslog: Self::init_syslog(app_name).map(Mutex::new),
        }
    }

    /// Логгер, который всегда пишет в stderr.
    pub fn stderr(app_name: &str) -> Self {
        SystemLogger {
            app_name: app_name.to_owned(),
            #[cfg(target_os = "linux")]
            syslog: None,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[cfg(target_os = "linux")]
    fn init_syslog(app_name: &str) -> Option<Syslog> {
        let formatter = syslog::Formatter3164 {
            facility: syslog::Facility::LOG_USER,
            hostname: None,
            process: app_name.to_owned(),
            pid: std::process::id(),
        };
        match syslog::unix(formatter) {
            Ok(logger) => Some(logger),
            Err(e) => {
                tracing::debug!(error = %e, "syslog unavailable, falling back to stderr");
                None
            }
        }
    }

    #[cfg(target_os = "linux")]
    fn write(&self, level: LogLevel, message: &str) {
        let Some(ref syslog) = self.syslog else {
            return self.write_stderr(level, message);
        };
        let mut logger = syslog.lock().unwrap_or_else(PoisonError::into_inner);
        let sent = match level {
            LogLevel::Critical => logger.crit(message),
            LogLevel::Error => logger.err(message),
            LogLevel::Warning => logger.warning(message),
            LogLevel::Info => logger.info(message),
            LogLevel::Debug => logger.debug(message),
        };
        if sent.is_err() {
            drop(logger);
            self.write_stderr(level, message);
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn write(&self, level: LogLevel, message: &str) {
        self.write_stderr(level, message);
    }

    fn write_stderr(&self, level: LogLevel, message: &str) {
        eprintln!("[{}] {}: {}", self.app_name, level, message);
    }
}

impl Logger for SystemLogger {
    fn printf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.write(level, &fmt::format(args));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_backend_accepts_every_level() {
        let logger = SystemLogger::stderr("rotlog-test");
        assert_eq!(logger.app_name(), "rotlog-test");

        crate::critical!(logger, "critical: {}", 1);
        crate::error!(logger, "error: {}", 2);
        crate::warning!(logger, "warning: {}", 3);
        crate::info!(logger, "info: {}", 4);
        crate::debug!(logger, "debug: {}", 5);
    }

    #[test]
    fn system_backend_never_panics() {
        // syslog может отсутствовать в песочнице, тогда уходим в stderr
        let logger = SystemLogger::new("rotlog-test");
        crate::log!(logger, LogLevel::Info, "hello from {}", "tests");
    }
}
