use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::error::LogError;

// ===== Имена файлов =====

const TIME_FORMAT: &str = "%Y%m%d%H%M%S";

static FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^app_([0-9]+)\.log$").expect("file name pattern is valid"));

/// Имя файла для лога, созданного в момент `at`: `app_<YYYYMMDDHHMMSS>.log` (UTC).
pub fn file_name_for(at: DateTime<Utc>) -> String {
    format!("app_{}.log", at.format(TIME_FORMAT))
}

/// Время создания, закодированное в имени файла.
///
/// `Ok(None)` — имя не похоже на лог-файл, такие файлы молча игнорируются.
/// `Err` — имя совпало с шаблоном, но метка времени битая.
pub fn parse_created_at(name: &str) -> Result<Option<DateTime<Utc>>, LogError> {
    let Some(caps) = FILE_NAME_RE.captures(name) else {
        return Ok(None);
    };
    let naive = NaiveDateTime::parse_from_str(&caps[1], TIME_FORMAT).map_err(|_| {
        LogError::MalformedName {
            name: name.to_owned(),
        }
    })?;
    Ok(Some(Utc.from_utc_datetime(&naive)))
}

// ===== Снимок лог-файла =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub dir: PathBuf,
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn from_metadata(
        dir: &Path,
        name: &str,
        meta: &Metadata,
        created_at: DateTime<Utc>,
    ) -> Self {
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(created_at);
        FileRecord {
            dir: dir.to_path_buf(),
            name: name.to_owned(),
            size: meta.len(),
            modified,
            created_at,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    #[cfg(test)]
    pub(crate) fn created(created_at: DateTime<Utc>) -> Self {
        FileRecord {
            dir: PathBuf::new(),
            name: file_name_for(created_at),
            size: 0,
            modified: created_at,
            created_at,
        }
    }
}
