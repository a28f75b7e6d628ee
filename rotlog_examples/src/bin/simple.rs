// example_simple — простой пример: инициализация, логи в файл, завершение

use rotlog::{critical, debug, error, warning, FileLogger, Logger, NeverRotate, SystemLogger};

const APP_NAME: &str = "example_simple";
const APP_VERSION: &str = "1.0.0";

fn main() {
    // 1. Преамбула: пишем в системный лог
    let system_logger = SystemLogger::new(APP_NAME);
    system_logger.infof(format_args!("Starting {} v{}", APP_NAME, APP_VERSION));

    // 2. Инициализация: файловый лог открывается лениво, при первой записи
    let file_logger = FileLogger::new("logs").rotated_by(NeverRotate);

    if false {
        critical!(file_logger, "Simulated fatal during init");
        system_logger.errorf(format_args!("Application failed to initialize"));
        std::process::exit(1);
    }

    // 3. Основной код — только в файл
    debug!(file_logger, "Application initialized successfully");
    debug!(file_logger, "Processing data block #1");
    warning!(file_logger, "Non-critical issue detected");
    error!(file_logger, "An error occurred, but we continue");
    debug!(file_logger, "Processing data block #2");

    if let Some(path) = file_logger.current_file() {
        println!("Records written to {}", path.display());
    }

    // 4. Финальная часть
    file_logger.close();
    system_logger.infof(format_args!("Application finished successfully"));
}
