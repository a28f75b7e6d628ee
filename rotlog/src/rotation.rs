use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::file_info::FileRecord;

/// Решает, пора ли перед очередной записью переключиться на новый файл.
pub trait RotationStrategy: Send + Sync {
    fn should_rotate(&self, file: &FileRecord) -> bool;
}

/// Момент `now - age`. `None`, если `age` не помещается в шкалу времени.
pub(crate) fn cutoff(now: DateTime<Utc>, age: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(age)
        .ok()
        .and_then(|age| now.checked_sub_signed(age))
}

// ===== Ротация по возрасту файла =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBased {
    pub max_age: Duration,
}

impl TimeBased {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn should_rotate_at(&self, file: &FileRecord, now: DateTime<Utc>) -> bool {
        // Строго старше max_age: ровно max_age ещё не ротируем
        match cutoff(now, self.max_age) {
            Some(limit) => file.created_at < limit,
            None => false,
        }
    }
}

impl Default for TimeBased {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

impl RotationStrategy for TimeBased {
    fn should_rotate(&self, file: &FileRecord) -> bool {
        self.should_rotate_at(file, Utc::now())
    }
}

// ===== Без ротации =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverRotate;

impl RotationStrategy for NeverRotate {
    fn should_rotate(&self, _file: &FileRecord) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn time_based_rotates_only_old_files() {
        let now = Utc::now();
        let max_age = chrono::Duration::hours(1);
        let minute = chrono::Duration::minutes(1);
        let tbr = TimeBased::new(HOUR);

        let young = FileRecord::created(now - max_age + minute);
        let old = FileRecord::created(now - max_age - minute);

        assert!(!tbr.should_rotate_at(&young, now));
        assert!(tbr.should_rotate_at(&old, now));
        assert!(tbr.should_rotate(&old));
    }

    #[test]
    fn time_based_boundary_does_not_rotate() {
        let now = Utc::now();
        let exactly = FileRecord::created(now - chrono::Duration::hours(1));
        assert!(!TimeBased::new(HOUR).should_rotate_at(&exactly, now));
    }

    #[test]
    fn huge_max_age_never_rotates() {
        let file = FileRecord::created(Utc::now() - chrono::Duration::days(100 * 365));
        assert!(!TimeBased::new(Duration::MAX).should_rotate(&file));
    }

    #[test]
    fn default_is_one_day() {
        assert_eq!(TimeBased::default().max_age, 24 * HOUR);
    }

    #[test]
    fn never_rotate_is_always_false() {
        let now = Utc::now();
        for created in [now, now - chrono::Duration::days(365), now + chrono::Duration::days(1)] {
            assert!(!NeverRotate.should_rotate(&FileRecord::created(created)));
        }
    }
}
