use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{LogError, Result};
use crate::file_info::{file_name_for, parse_created_at, FileRecord};
use crate::rotation::{RotationStrategy, TimeBased};
use crate::{LogLevel, Logger};

pub const DEFAULT_LOG_DIR: &str = "/var/log/app_engine";

const ERROR_LOG: &str = "error.log";

/// Вызывается, когда запись в лог не удалась. Получает ошибку, уровень и
/// уже отформатированное сообщение, которое не удалось записать.
///
/// Колбэк вызывается под блокировкой логгера: писать из него в тот же
/// логгер нельзя.
pub type ErrorCallback = Arc<dyn Fn(&LogError, LogLevel, &str) + Send + Sync>;

// ===== Формат записи =====

#[derive(Serialize)]
struct Timestamp {
    seconds: i64,
    nanos: u32,
}

#[derive(Serialize)]
struct LogPayload<'a> {
    timestamp: Timestamp,
    severity: LogLevel,
    message: &'a str,
}

// ===== Открытый файл =====

struct OpenFile {
    file: File,
    name: String,
    path: PathBuf,
    created_at: DateTime<Utc>,
}

impl OpenFile {
    fn record(&self, dir: &Path) -> Result<FileRecord> {
        let meta = self
            .file
            .metadata()
            .map_err(|e| LogError::io(&self.path, e))?;
        Ok(FileRecord::from_metadata(dir, &self.name, &meta, self.created_at))
    }

    fn close(self) -> Result<()> {
        let OpenFile { mut file, path, .. } = self;
        file.flush().map_err(|e| LogError::io(path, e))
    }
}

// ===== Файловый логгер =====

/// Пишет по одной JSON-строке на вызов в `dir/app_<UTC>.log`.
///
/// Все операции с файлом (открытие, ротация, запись, закрытие) идут под
/// одним мьютексом. Ошибки не возвращаются вызывающему, а уходят в
/// [`ErrorCallback`].
pub struct FileLogger {
    dir: PathBuf,
    rotation: Box<dyn RotationStrategy>,
    on_unexpected_error: ErrorCallback,
    current: Mutex<Option<OpenFile>>,
}

impl FileLogger {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        FileLogger {
            dir: dir.as_ref().to_path_buf(),
            rotation: Box::new(TimeBased::default()),
            on_unexpected_error: Arc::new(report_to_stderr),
            current: Mutex::new(None),
        }
    }

    pub fn rotated_by<R: RotationStrategy + 'static>(mut self, strategy: R) -> Self {
        self.rotation = Box::new(strategy);
        self
    }

    pub fn on_unexpected_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LogError, LogLevel, &str) + Send + Sync + 'static,
    {
        self.on_unexpected_error = Arc::new(callback);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Путь к активному файлу, если он уже открыт.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|open| open.path.clone())
    }

    /// Принудительно переключает запись на новый файл.
    pub fn rotate(&self) -> Result<()> {
        let mut current = self.lock();
        if let Some(old) = self.rotate_locked(&mut current)? {
            old.close()?;
        }
        Ok(())
    }

    /// Закрывает активный файл. Повторный вызов ничего не делает; следующая
    /// запись откроет новый файл.
    pub fn close(&self) {
        let old = self.lock().take();
        if let Some(old) = old {
            let path = old.path.clone();
            if let Err(e) = old.close() {
                tracing::warn!(path = %path.display(), error = %e, "failed to close log file");
            }
        }
    }

    /// Файлы логгера, которые больше не используются для записи.
    ///
    /// Чужие имена пропускаются молча. Имя, совпавшее с шаблоном, но с
    /// битой меткой времени, попадает в лог как ошибка и тоже пропускается.
    pub fn removable_files(&self) -> Vec<FileRecord> {
        let active = self.lock().as_ref().map(|open| open.name.clone());

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.errorf(format_args!("failed to read dir: {}: {}", self.dir.display(), e));
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.errorf(format_args!("failed to read dir: {}: {}", self.dir.display(), e));
                    continue;
                }
            };
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if active.as_deref() == Some(name.as_str()) {
                continue;
            }
            let created_at = match parse_created_at(&name) {
                Ok(Some(created_at)) => created_at,
                Ok(None) => continue,
                Err(e) => {
                    self.errorf(format_args!("{}", e));
                    continue;
                }
            };
            match entry.metadata() {
                Ok(meta) if meta.is_file() => {
                    files.push(FileRecord::from_metadata(&self.dir, &name, &meta, created_at));
                }
                Ok(_) => {}
                Err(e) => {
                    self.errorf(format_args!("failed to stat: {}: {}", entry.path().display(), e));
                }
            }
        }

        // Имена кодируют время создания, так что порядок по имени хронологический
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }

    fn lock(&self) -> MutexGuard<'_, Option<OpenFile>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn recover_error(&self, err: &LogError, level: LogLevel, message: &str) {
        (self.on_unexpected_error)(err, level, message);
    }

    fn open_file(&self, now: DateTime<Utc>) -> Result<OpenFile> {
        fs::create_dir_all(&self.dir).map_err(|e| LogError::io(&self.dir, e))?;

        let name = file_name_for(now);
        let path = self.dir.join(&name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::io(&path, e))?;

        tracing::debug!(path = %path.display(), "opened log file");
        Ok(OpenFile {
            file,
            name,
            path,
            created_at: now,
        })
    }

    /// Открывает новый файл и ставит его активным. Старый файл возвращается
    /// вызывающему, чтобы тот решил, куда девать ошибку закрытия.
    fn rotate_locked(&self, current: &mut Option<OpenFile>) -> Result<Option<OpenFile>> {
        let opened = self.open_file(Utc::now())?;
        Ok(current.replace(opened))
    }

    fn write_record(
        &self,
        current: &mut Option<OpenFile>,
        level: LogLevel,
        message: &str,
        payload: &LogPayload<'_>,
    ) -> Result<()> {
        let rotate = match current.as_ref() {
            None => true,
            Some(open) => match open.record(&self.dir) {
                Ok(record) => self.rotation.should_rotate(&record),
                Err(e) => {
                    self.recover_error(&e, level, message);
                    false
                }
            },
        };

        if rotate {
            match self.rotate_locked(current) {
                Ok(Some(old)) => {
                    if let Err(e) = old.close() {
                        self.recover_error(&e, level, message);
                    }
                }
                Ok(None) => {}
                // Новый файл не открылся: пишем в старый, если он есть
                Err(e) => self.recover_error(&e, level, message),
            }
        }

        // Открыть файл не удалось, ошибка уже ушла в колбэк
        let Some(open) = current.as_mut() else {
            return Ok(());
        };

        let mut line = serde_json::to_vec(payload)?;
        line.push(b'\n');
        open.file
            .write_all(&line)
            .map_err(|e| LogError::io(&open.path, e))
    }
}

impl Default for FileLogger {
    fn default() -> Self {
        FileLogger::new(DEFAULT_LOG_DIR)
    }
}

impl Logger for FileLogger {
    fn printf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let message = fmt::format(args);
        let now = Utc::now();
        let payload = LogPayload {
            timestamp: Timestamp {
                seconds: now.timestamp(),
                nanos: now.timestamp_subsec_nanos(),
            },
            severity: level,
            message: &message,
        };

        let mut current = self.lock();
        if let Err(e) = self.write_record(&mut current, level, &message, &payload) {
            self.recover_error(&e, level, &message);
        }
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.close();
    }
}

fn unexpected_error_line(err: &LogError, level: LogLevel, message: &str) -> String {
    format!("unexpected error: {}: {}: {}\n", err, level, message)
}

fn report_to_stderr(err: &LogError, level: LogLevel, message: &str) {
    let line = unexpected_error_line(err, level, message);
    eprint!("{}", line);
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(ERROR_LOG) {
        let _ = file.write_all(line.as_bytes());
    }
}
