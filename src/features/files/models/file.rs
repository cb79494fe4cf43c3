use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Database model for vault files.
///
/// `deleted_at` carries the lifecycle state: null = active, non-null = in
/// trash. Purged files have no row at all.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub storage_key: String,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub original_created_at: Option<DateTime<Utc>>,
    pub effective_date: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a confirmed upload.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub storage_key: String,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub original_created_at: Option<DateTime<Utc>>,
    pub effective_date: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Storage keys are derived, never client-chosen: `{prefix}/{owner}/{id}`.
pub fn storage_key_for(prefix: &str, owner_id: &str, file_id: Uuid) -> String {
    format!("{}/{}/{}", prefix, owner_id, file_id)
}

/// End of the retention window for a file trashed at `deleted_at`.
pub fn expires_at(deleted_at: DateTime<Utc>, retention_days: i64) -> DateTime<Utc> {
    deleted_at + Duration::days(retention_days)
}

/// Whole days remaining before expiry, rounded up and floored at 0.
///
/// Display-only projection; the sweep that enforces expiry lives outside
/// this service.
pub fn days_left(deleted_at: DateTime<Utc>, retention_days: i64, now: DateTime<Utc>) -> i64 {
    let remaining_secs = (expires_at(deleted_at, retention_days) - now).num_seconds();
    if remaining_secs <= 0 {
        return 0;
    }
    (remaining_secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trashed_at() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_storage_key_shape() {
        let id = Uuid::nil();
        assert_eq!(
            storage_key_for("vault", "user-1", id),
            format!("vault/user-1/{}", id)
        );
    }

    #[test]
    fn test_days_left_full_window_just_after_trashing() {
        let now = trashed_at() + Duration::seconds(1);
        assert_eq!(days_left(trashed_at(), 30, now), 30);
    }

    #[test]
    fn test_days_left_rounds_partial_days_up() {
        // One second short of expiry still reads as one day left
        let now = expires_at(trashed_at(), 30) - Duration::seconds(1);
        assert_eq!(days_left(trashed_at(), 30, now), 1);
    }

    #[test]
    fn test_days_left_floors_at_zero() {
        assert_eq!(days_left(trashed_at(), 30, expires_at(trashed_at(), 30)), 0);

        let long_gone = trashed_at() + Duration::days(400);
        assert_eq!(days_left(trashed_at(), 30, long_gone), 0);
    }

    #[test]
    fn test_days_left_never_increases_as_time_advances() {
        let mut previous = i64::MAX;
        for hours in (0..=31 * 24).step_by(7) {
            let now = trashed_at() + Duration::hours(hours as i64);
            let left = days_left(trashed_at(), 30, now);
            assert!(left <= previous, "countdown went up at hour {}", hours);
            assert!(left >= 0);
            previous = left;
        }
    }
}
