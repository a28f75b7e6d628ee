// example_advanced — многопоточный пример с "классом" Worker
// Каждый поток — экземпляр структуры Worker, которой передаётся клон логгера

use rotlog::{debug, error, warning, FileLogger, Logger, SystemLogger, TimeBased};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const APP_NAME: &str = "example_advanced";
const APP_VERSION: &str = "1.1.0";

pub struct Worker {
    id: u32,
    log: Arc<FileLogger>,
}

impl Worker {
    pub fn new(id: u32, log: Arc<FileLogger>) -> Self {
        Self { id, log }
    }

    pub fn run(&self) {
        debug!(self.log, "Worker {} started execution", self.id);

        // Имитация работы
        thread::sleep(Duration::from_millis(50 + (self.id as u64) * 100));

        if self.id % 2 == 1 {
            warning!(self.log, "Worker {} detected odd workload", self.id);
        }

        if self.id == 2 {
            error!(self.log, "Worker {} encountered a transient error", self.id);
        }

        debug!(self.log, "Worker {} finished", self.id);
    }
}

fn main() {
    // 1. Преамбула: запись в системный лог
    let system_logger = SystemLogger::new(APP_NAME);
    system_logger.infof(format_args!("Starting {} v{}", APP_NAME, APP_VERSION));

    // 2. Инициализация: файл живёт не дольше часа
    let file_logger = FileLogger::new("logs")
        .rotated_by(TimeBased::new(Duration::from_secs(3600)))
        .on_unexpected_error(|err, level, message| {
            eprintln!("[{}] lost {} record '{}': {}", APP_NAME, level, message, err);
        });

    // Оборачиваем логгер в Arc, чтобы безопасно клонировать между потоками
    let shared_logger = Arc::new(file_logger);

    debug!(shared_logger, "Main thread initialized, spawning workers...");

    // 3. Основной код: создание потоков с объектами Worker
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger_clone = Arc::clone(&shared_logger);
            thread::spawn(move || Worker::new(i, logger_clone).run())
        })
        .collect();

    for h in handles {
        let _ = h.join();
    }

    debug!(shared_logger, "All workers have finished");

    // 4. Финальная часть
    system_logger.infof(format_args!("Application finished successfully"));
}
