// example_tokio — асинхронный пример с tokio, shared FileLogger и фоновой очисткой

use rotlog::{debug, error, schedule_cleanup, warning, FileLogger, Logger, RemoveAll, SystemLogger, TimeBased};
use std::sync::Arc;
use tokio::task;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "example_tokio";
const APP_VERSION: &str = "1.0.0";

// Асинхронный "воркер"
pub struct Worker {
    id: u32,
    log: Arc<FileLogger>,
}

impl Worker {
    pub fn new(id: u32, log: Arc<FileLogger>) -> Self {
        Self { id, log }
    }

    pub async fn run(&self) {
        debug!(self.log, "Worker {} started (async)", self.id);

        sleep(Duration::from_millis(500 + (self.id as u64) * 400)).await;

        if self.id % 3 == 0 {
            warning!(self.log, "Worker {} has high priority task", self.id);
        }

        if self.id == 2 {
            error!(self.log, "Worker {} failed to process data", self.id);
        }

        debug!(self.log, "Worker {} completed", self.id);
    }
}

#[tokio::main]
async fn main() {
    // 0. Диагностика rotlog в stderr, уровень через RUST_LOG (по умолчанию debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rotlog=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 1. Преамбула: системный лог
    let system_logger = SystemLogger::new(APP_NAME);
    system_logger.infof(format_args!("Starting {} v{}", APP_NAME, APP_VERSION));

    // 2. Инициализация: файловый лог и очистка каждые 2 секунды
    let shared_logger = Arc::new(
        FileLogger::new("logs").rotated_by(TimeBased::new(Duration::from_secs(1))),
    );
    let cancel = CancellationToken::new();
    let cleanup = task::spawn(schedule_cleanup(
        Duration::from_secs(2),
        Arc::clone(&shared_logger),
        RemoveAll,
        cancel.clone(),
    ));

    debug!(shared_logger, "Tokio runtime initialized, spawning async tasks...");

    // 3. Основной код: запуск нескольких асинхронных задач
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let logger_clone = Arc::clone(&shared_logger);
            task::spawn(async move { Worker::new(i, logger_clone).run().await })
        })
        .collect();

    for h in handles {
        let _ = h.await;
    }

    debug!(shared_logger, "All async tasks completed");

    // 4. Финальная часть: останавливаем очистку и дожидаемся её выхода
    cancel.cancel();
    let _ = cleanup.await;
    shared_logger.close();

    system_logger.infof(format_args!("Application finished successfully"));
}
