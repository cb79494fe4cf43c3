/// Days a trashed file is kept before it becomes eligible for permanent
/// deletion. Overridable via TRASH_RETENTION_DAYS.
pub const DEFAULT_TRASH_RETENTION_DAYS: i64 = 30;

/// Maximum number of file ids accepted by one batch lifecycle request.
pub const MAX_BATCH_SIZE: u64 = 100;
