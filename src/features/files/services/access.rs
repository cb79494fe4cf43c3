//! Ownership / permission resolution for file operations.
//!
//! Every operation resolves the caller's access level exactly once and
//! branches on the result; there are no per-route ownership checks.

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::models::FileRecord;
use crate::features::files::store::FileStore;

/// Caller's relationship to a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccess {
    Owner,
    /// Non-owner holding a read grant. Never sufficient for mutations.
    PermittedReader,
    Denied,
}

impl FileAccess {
    pub fn allows_read(self) -> bool {
        !matches!(self, FileAccess::Denied)
    }

    pub fn allows_mutation(self) -> bool {
        matches!(self, FileAccess::Owner)
    }
}

/// Ownership-only resolution, for mutating operations. Read grants are
/// not consulted; they never authorize mutations.
pub fn resolve_owner(caller: &AuthenticatedUser, record: &FileRecord) -> FileAccess {
    if record.owner_id == caller.id {
        FileAccess::Owner
    } else {
        FileAccess::Denied
    }
}

/// Full resolution for read-style operations: ownership short-circuits,
/// otherwise the grant table decides.
pub async fn resolve_read(
    caller: &AuthenticatedUser,
    record: &FileRecord,
    store: &dyn FileStore,
) -> Result<FileAccess> {
    if record.owner_id == caller.id {
        return Ok(FileAccess::Owner);
    }

    if store.has_read_grant(record.id, &caller.id).await? {
        Ok(FileAccess::PermittedReader)
    } else {
        Ok(FileAccess::Denied)
    }
}

/// Reject non-owners with `Forbidden`; denial is never a silent no-op.
pub fn require_owner(
    caller: &AuthenticatedUser,
    record: &FileRecord,
    action: &str,
) -> Result<()> {
    if resolve_owner(caller, record).allows_mutation() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only the file owner can {}",
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::store::memory::MemoryFileStore;
    use crate::shared::test_helpers::{other_user, test_user};
    use chrono::Utc;
    use uuid::Uuid;

    fn record_owned_by(owner_id: &str) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            storage_key: format!("vault/{}/{}", owner_id, Uuid::new_v4()),
            original_filename: "IMG_0001.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 2048,
            original_created_at: None,
            effective_date: now,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_resolution() {
        let owner = test_user();
        let record = record_owned_by(&owner.id);

        assert_eq!(resolve_owner(&owner, &record), FileAccess::Owner);
        assert_eq!(resolve_owner(&other_user(), &record), FileAccess::Denied);
    }

    #[test]
    fn test_only_owner_may_mutate() {
        assert!(FileAccess::Owner.allows_mutation());
        assert!(!FileAccess::PermittedReader.allows_mutation());
        assert!(!FileAccess::Denied.allows_mutation());
    }

    #[tokio::test]
    async fn test_read_resolution_consults_grants() {
        let owner = test_user();
        let reader = other_user();
        let record = record_owned_by(&owner.id);
        let store = MemoryFileStore::new();

        let access = resolve_read(&reader, &record, &store).await.unwrap();
        assert_eq!(access, FileAccess::Denied);

        store.insert_grant(record.id, &reader.id);
        let access = resolve_read(&reader, &record, &store).await.unwrap();
        assert_eq!(access, FileAccess::PermittedReader);
        assert!(access.allows_read());
        assert!(!access.allows_mutation());
    }

    #[test]
    fn test_require_owner_rejects_non_owner() {
        let owner = test_user();
        let record = record_owned_by(&owner.id);

        assert!(require_owner(&owner, &record, "delete this file").is_ok());
        let err = require_owner(&other_user(), &record, "delete this file").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
