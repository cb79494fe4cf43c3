use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Read grant for a non-owner. Removed by the foreign-key cascade when the
/// file row is permanently deleted.
#[derive(Debug, Clone, FromRow)]
pub struct FilePermission {
    pub file_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
