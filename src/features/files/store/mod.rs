//! Record store seam for file metadata.
//!
//! Lifecycle transitions are conditional writes (`WHERE deleted_at IS
//! [NOT] NULL`), making the store's row update the serialization point:
//! of two racing transitions, exactly one matches the predicate and the
//! loser observes zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileRecord, NewFileRecord};

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgFileStore;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a newly confirmed upload. A duplicate id fails with
    /// `Conflict`; callers treat that as an accepted error path.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// Set `deleted_at` if the record is currently active. Returns the
    /// updated record, or None if no active row matched.
    async fn mark_trashed(&self, id: Uuid, deleted_at: DateTime<Utc>)
        -> Result<Option<FileRecord>>;

    /// Clear `deleted_at` if the record is currently trashed. Returns the
    /// updated record, or None if no trashed row matched.
    async fn mark_restored(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// Remove the row if it is currently trashed, cascading permission
    /// grants. Returns whether a row was removed.
    async fn delete_trashed(&self, id: Uuid) -> Result<bool>;

    /// Owner's active files, newest effective date first.
    async fn list_active(&self, owner_id: &str) -> Result<Vec<FileRecord>>;

    /// Owner's trashed files, most recently trashed first.
    async fn list_trashed(&self, owner_id: &str) -> Result<Vec<FileRecord>>;

    /// Whether a read grant exists for `(file_id, user_id)`.
    async fn has_read_grant(&self, file_id: Uuid, user_id: &str) -> Result<bool>;
}
