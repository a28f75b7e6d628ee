//! example_rotation — демонстрация ротации логов по времени

use rotlog::{clean_once, debug, error, warning, FileLogger, Logger, RemoveCreatedBefore, SystemLogger, TimeBased};
use std::thread;
use std::time::Duration;

const APP_NAME: &str = "example_rotation";
const APP_VERSION: &str = "1.0.0";

// Короткий срок жизни файла — чтобы ротация сработала быстро
const MAX_FILE_AGE: Duration = Duration::from_secs(1);
const KEEP_FOR: Duration = Duration::from_secs(3);

fn main() {
    // 1. Преамбула: пишем в системный лог
    let system_logger = SystemLogger::new(APP_NAME);
    system_logger.debugf(format_args!("Starting {} v{}", APP_NAME, APP_VERSION));

    // 2. Инициализация
    let file_logger = FileLogger::new("logs").rotated_by(TimeBased::new(MAX_FILE_AGE));

    debug!(file_logger, "Logger initialized with max_age={:?}", MAX_FILE_AGE);

    // 3. Основной код: пишем несколько секунд, файлы сменяются каждую секунду
    for i in 0..50 {
        debug!(file_logger, "This is a debug message number {}", i);
        if i % 15 == 0 {
            warning!(file_logger, "Warning message at iteration {}", i);
        }
        if i % 35 == 0 {
            error!(file_logger, "Error message at iteration {}", i);
        }
        thread::sleep(Duration::from_millis(100));
    }

    println!("Rotated files:");
    for fi in file_logger.removable_files() {
        println!("  {} ({} bytes, created {})", fi.name, fi.size, fi.created_at);
    }

    // Удаляем всё, что старше KEEP_FOR
    let removed = clean_once(&file_logger, &RemoveCreatedBefore::new(KEEP_FOR));
    println!("Removed {} file(s), {} left", removed, file_logger.removable_files().len());

    // 4. Финальная часть
    system_logger.debugf(format_args!("Application finished successfully"));
}
