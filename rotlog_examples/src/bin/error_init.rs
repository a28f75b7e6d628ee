// example_error_init — пример с ошибкой открытия файла
// Запись не падает: ошибка уходит в колбэк, приложение решает само

use rotlog::{critical, debug, FileLogger, Logger, SystemLogger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const APP_NAME: &str = "example_error_init";
const APP_VERSION: &str = "1.0.0";

fn main() {
    // 1. Преамбула
    let system_logger = Arc::new(SystemLogger::new(APP_NAME));
    system_logger.infof(format_args!("Starting {} v{}", APP_NAME, APP_VERSION));

    // 2. Инициализация — имитируем ошибку
    let log_dir = "/proc/forbidden"; // Недоступная директория
    let failures = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&system_logger);
    let counter = Arc::clone(&failures);
    let file_logger = FileLogger::new(log_dir).on_unexpected_error(move |err, level, message| {
        counter.fetch_add(1, Ordering::SeqCst);
        sink.errorf(format_args!("unexpected error: {}: {}: {}", err, level, message));
    });

    critical!(file_logger, "Insufficient memory to continue");

    if failures.load(Ordering::SeqCst) > 0 {
        system_logger.errorf(format_args!("Failed to open log file in {}", log_dir));
        std::process::exit(1);
    }

    // 3. Основной код (не достигается)
    debug!(file_logger, "This will not be logged");

    // 4. Финальная часть
    system_logger.infof(format_args!("Application finished successfully"));
}
