use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::file_info::FileRecord;

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Encode(#[from] serde_json::Error),

    #[error("unexpected file name: {name}")]
    MalformedName { name: String },
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Ошибка стратегии очистки. Несёт частичную выборку, с которой очистка
/// продолжает работу.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StrategyError {
    pub message: String,
    pub selected: Vec<FileRecord>,
}
