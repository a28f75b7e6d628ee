use chrono::{DateTime, Utc};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::StrategyError;
use crate::file_info::FileRecord;
use crate::file_logger::FileLogger;
use crate::rotation::cutoff;
use crate::Logger;

/// Выбирает из неактивных файлов те, что пора удалить. Сама ничего не
/// удаляет.
///
/// При ошибке стратегия отдаёт в [`StrategyError::selected`] то, что успела
/// выбрать; очистка продолжится с этой выборкой.
pub trait CleanupStrategy: Send + Sync {
    fn apply(&self, candidates: Vec<FileRecord>) -> Result<Vec<FileRecord>, StrategyError>;
}

// ===== Удаление старше порога =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveCreatedBefore {
    pub threshold: Duration,
}

impl RemoveCreatedBefore {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    pub fn apply_at(&self, candidates: Vec<FileRecord>, now: DateTime<Utc>) -> Vec<FileRecord> {
        let Some(limit) = cutoff(now, self.threshold) else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|fi| fi.created_at < limit)
            .collect()
    }
}

impl CleanupStrategy for RemoveCreatedBefore {
    fn apply(&self, candidates: Vec<FileRecord>) -> Result<Vec<FileRecord>, StrategyError> {
        Ok(self.apply_at(candidates, Utc::now()))
    }
}

// ===== Удаление всего =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveAll;

impl CleanupStrategy for RemoveAll {
    fn apply(&self, candidates: Vec<FileRecord>) -> Result<Vec<FileRecord>, StrategyError> {
        Ok(candidates)
    }
}

// ===== Очистка =====

/// Удаляет неактивные файлы логгера, выбранные стратегией. Ошибка одного
/// удаления не мешает остальным. Возвращает число удалённых файлов.
pub fn clean_once<S: CleanupStrategy + ?Sized>(logger: &FileLogger, strategy: &S) -> usize {
    let selected = match strategy.apply(logger.removable_files()) {
        Ok(selected) => selected,
        Err(e) => {
            logger.errorf(format_args!("strategy error: {}", e));
            e.selected
        }
    };

    let mut removed = 0;
    for fi in &selected {
        let path = fi.path();
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not remove log file");
                logger.errorf(format_args!("could not remove a file: {}: {}", path.display(), e));
            }
        }
    }

    if removed > 0 {
        tracing::info!(dir = %logger.dir().display(), removed, "old log files removed");
    }
    removed
}

/// Запускает [`clean_once`] каждые `interval`, первый раз через полный
/// интервал после старта, пока не сработает `cancel`.
///
/// Начатая очистка всегда доводится до конца; отменённый тик не
/// выполняется.
pub async fn schedule_cleanup<S>(
    interval: Duration,
    logger: Arc<FileLogger>,
    strategy: S,
    cancel: CancellationToken,
) where
    S: CleanupStrategy + 'static,
{
    let strategy = Arc::new(strategy);
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let logger = Arc::clone(&logger);
        let strategy = Arc::clone(&strategy);
        let joined =
            tokio::task::spawn_blocking(move || clean_once(&logger, strategy.as_ref())).await;
        if let Err(e) = joined {
            tracing::error!(error = %e, "cleanup task failed");
        }
    }

    tracing::debug!(dir = %logger.dir().display(), "cleanup scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::NeverRotate;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn records(now: DateTime<Utc>, hours_ago: &[i64]) -> Vec<FileRecord> {
        hours_ago
            .iter()
            .map(|h| FileRecord::created(now - chrono::Duration::hours(*h)))
            .collect()
    }

    #[test]
    fn remove_created_before_selects_old_files_in_order() {
        let now = Utc::now();
        let latest = Duration::from_secs(3 * 3600);
        let cases: [(&[i64], &[i64]); 4] = [
            (&[1, 2, 4, 5], &[4, 5]),
            (&[4, 6, 5], &[4, 6, 5]),
            (&[0, 1, 2], &[]),
            (&[], &[]),
        ];

        for (input, expect) in cases {
            let got = RemoveCreatedBefore::new(latest).apply_at(records(now, input), now);
            assert_eq!(got, records(now, expect), "input {input:?}");

            let all = RemoveAll.apply(records(now, input)).unwrap();
            assert_eq!(all, records(now, input));
        }
    }

    #[test]
    fn remove_created_before_keeps_boundary() {
        let now = Utc::now();
        let input = records(now, &[3]);
        let got = RemoveCreatedBefore::new(Duration::from_secs(3 * 3600)).apply_at(input, now);
        assert!(got.is_empty());
    }

    #[test]
    fn empty_input_is_ok() {
        assert!(RemoveCreatedBefore::new(Duration::ZERO).apply(Vec::new()).unwrap().is_empty());
        assert!(RemoveAll.apply(Vec::new()).unwrap().is_empty());
    }

    struct FailingStrategy;

    impl CleanupStrategy for FailingStrategy {
        fn apply(&self, mut candidates: Vec<FileRecord>) -> Result<Vec<FileRecord>, StrategyError> {
            candidates.truncate(1);
            Err(StrategyError {
                message: "index unavailable".into(),
                selected: candidates,
            })
        }
    }

    fn seeded_logger(dir: &TempDir, names: &[&str]) -> FileLogger {
        for name in names {
            fs::write(dir.path().join(name), "{}\n").unwrap();
        }
        let logger = FileLogger::new(dir.path())
            .rotated_by(NeverRotate)
            .on_unexpected_error(|err, _, _| panic!("{err}"));
        crate::info!(logger, "active");
        logger
    }

    #[test]
    fn clean_once_removes_selected_and_keeps_active() {
        let dir = TempDir::new().unwrap();
        let logger = seeded_logger(&dir, &["app_20200101000000.log", "app_20200102000000.log", "keep.txt"]);

        assert_eq!(clean_once(&logger, &RemoveAll), 2);
        assert!(logger.removable_files().is_empty());
        assert!(logger.current_file().unwrap().exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn clean_once_uses_partial_selection_on_strategy_error() {
        let dir = TempDir::new().unwrap();
        let logger = seeded_logger(&dir, &["app_20200101000000.log", "app_20200102000000.log"]);

        assert_eq!(clean_once(&logger, &FailingStrategy), 1);

        let left = logger.removable_files();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "app_20200102000000.log");

        let content = fs::read_to_string(logger.current_file().unwrap()).unwrap();
        assert!(content.contains("strategy error: index unavailable"), "{content}");
    }

    #[test]
    fn clean_once_reports_each_failed_removal() {
        let dir = TempDir::new().unwrap();
        let logger = seeded_logger(&dir, &["app_20200103000000.log"]);

        let ghosts = vec![
            FileRecord {
                dir: dir.path().to_path_buf(),
                ..FileRecord::created(Utc::now() - chrono::Duration::days(2))
            },
            FileRecord {
                dir: dir.path().to_path_buf(),
                ..FileRecord::created(Utc::now() - chrono::Duration::days(3))
            },
        ];
        let real = logger.removable_files();
        let selection = Mutex::new(Some(ghosts.into_iter().chain(real).collect::<Vec<_>>()));

        struct Fixed<'a>(&'a Mutex<Option<Vec<FileRecord>>>);
        impl CleanupStrategy for Fixed<'_> {
            fn apply(&self, _: Vec<FileRecord>) -> Result<Vec<FileRecord>, StrategyError> {
                Ok(self.0.lock().unwrap().take().unwrap_or_default())
            }
        }

        assert_eq!(clean_once(&logger, &Fixed(&selection)), 1);
        assert!(logger.removable_files().is_empty());

        let content = fs::read_to_string(logger.current_file().unwrap()).unwrap();
        assert_eq!(content.matches("could not remove a file").count(), 2, "{content}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn scheduled_cleanup_runs_on_ticks() {
        let dir = TempDir::new().unwrap();
        let logger = Arc::new(
            FileLogger::new(dir.path())
                .rotated_by(NeverRotate)
                .on_unexpected_error(|err, _, _| panic!("{err}")),
        );
        let cancel = CancellationToken::new();
        let task = tokio::spawn(schedule_cleanup(
            Duration::from_secs(2),
            Arc::clone(&logger),
            RemoveAll,
            cancel.clone(),
        ));

        logger.rotate().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        logger.rotate().unwrap();
        assert_eq!(logger.removable_files().len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(logger.removable_files().len(), 0);

        logger.rotate().unwrap();
        assert_eq!(logger.removable_files().len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(logger.removable_files().len(), 0);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_scheduler_exits_without_running() {
        let dir = TempDir::new().unwrap();
        let logger = Arc::new(seeded_logger(&dir, &["app_20200101000000.log"]));
        let cancel = CancellationToken::new();
        cancel.cancel();

        schedule_cleanup(Duration::from_millis(10), Arc::clone(&logger), RemoveAll, cancel).await;
        assert_eq!(logger.removable_files().len(), 1);
    }
}
