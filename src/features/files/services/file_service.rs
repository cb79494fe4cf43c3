use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    BatchFailureDto, BatchFileIdsDto, BatchResultDto, ConfirmUploadDto, DownloadUrlDto,
    FileResponseDto, TrashedFileDto, UploadMetadataDto, UploadRequestDto, UploadTicketDto,
};
use crate::features::files::models::{storage_key_for, FileRecord, NewFileRecord};
use crate::features::files::services::access;
use crate::features::files::store::FileStore;
use crate::modules::storage::ObjectStore;
use crate::shared::constants::MAX_BATCH_SIZE;

/// Service for the vault file lifecycle.
///
/// Uploads are negotiated (presigned PUT), then confirmed into the record
/// store. Confirmed records move between active and trash, and leave
/// through permanent deletion only. Every operation takes the caller
/// identity explicitly.
pub struct FileService {
    store: Arc<dyn FileStore>,
    objects: Arc<dyn ObjectStore>,
    key_prefix: String,
    trash_retention_days: i64,
}

impl FileService {
    pub fn new(
        store: Arc<dyn FileStore>,
        objects: Arc<dyn ObjectStore>,
        key_prefix: String,
        trash_retention_days: i64,
    ) -> Self {
        Self {
            store,
            objects,
            key_prefix,
            trash_retention_days,
        }
    }

    /// Negotiate an upload: fresh id, derived storage key, presigned PUT.
    ///
    /// Nothing is persisted here. A client that never confirms leaves at
    /// most an orphaned object in the bucket, which never surfaces to
    /// users.
    pub async fn request_upload(
        &self,
        caller: &AuthenticatedUser,
        dto: UploadRequestDto,
    ) -> Result<UploadTicketDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let file_id = Uuid::new_v4();
        let storage_key = storage_key_for(&self.key_prefix, &caller.id, file_id);
        let effective_date = dto.captured_at.unwrap_or_else(Utc::now);

        let upload_url = self
            .objects
            .presign_put(&storage_key, &dto.mime_type)
            .await?;

        debug!("Upload negotiated: id={}, key={}", file_id, storage_key);

        Ok(UploadTicketDto {
            upload_url,
            file_id,
            storage_key,
            expires_in_secs: self.objects.presign_expiry_secs(),
            metadata: UploadMetadataDto {
                original_filename: dto.filename,
                mime_type: dto.mime_type,
                file_size: dto.file_size,
                original_created_at: dto.captured_at,
                effective_date,
            },
        })
    }

    /// Register a confirmed upload as an active record.
    ///
    /// The storage key is re-derived from the caller and file id; a
    /// mismatched echo is rejected before touching the store. Confirming
    /// the same id twice fails with `Conflict` on the identity constraint.
    pub async fn confirm_upload(
        &self,
        caller: &AuthenticatedUser,
        dto: ConfirmUploadDto,
    ) -> Result<FileResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let expected_key = storage_key_for(&self.key_prefix, &caller.id, dto.file_id);
        if dto.storage_key != expected_key {
            return Err(AppError::Validation(
                "storage_key does not match the negotiated upload".to_string(),
            ));
        }

        let record = self
            .store
            .insert(NewFileRecord {
                id: dto.file_id,
                owner_id: caller.id.clone(),
                storage_key: dto.storage_key,
                original_filename: dto.metadata.original_filename,
                mime_type: dto.metadata.mime_type,
                file_size: dto.metadata.file_size,
                original_created_at: dto.metadata.original_created_at,
                effective_date: dto.metadata.effective_date,
            })
            .await?;

        info!(
            "File registered: id={}, key={}, size={}",
            record.id, record.storage_key, record.file_size
        );

        Ok(record.into())
    }

    /// Move an active file to trash. Owner only.
    pub async fn soft_delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<FileResponseDto> {
        let record = self.load(id).await?;
        access::require_owner(caller, &record, "delete this file")?;

        if record.is_trashed() {
            return Err(AppError::InvalidState(
                "File is already in trash".to_string(),
            ));
        }

        match self.store.mark_trashed(id, Utc::now()).await? {
            Some(updated) => {
                info!("File moved to trash: id={}, owner={}", id, caller.id);
                Ok(updated.into())
            }
            None => Err(self.lost_race(id).await),
        }
    }

    /// Bring a trashed file back. Owner only.
    pub async fn restore(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<FileResponseDto> {
        let record = self.load(id).await?;
        access::require_owner(caller, &record, "restore this file")?;

        if !record.is_trashed() {
            return Err(AppError::InvalidState("File is not in trash".to_string()));
        }

        match self.store.mark_restored(id).await? {
            Some(updated) => {
                info!("File restored from trash: id={}, owner={}", id, caller.id);
                Ok(updated.into())
            }
            None => Err(self.lost_race(id).await),
        }
    }

    /// Permanently delete a trashed file. Owner only; there is no direct
    /// active-to-purged path.
    ///
    /// Object deletion is best-effort: an orphaned object is less harmful
    /// than a stuck trash entry, so a storage failure is logged and the
    /// metadata deletion proceeds regardless.
    pub async fn purge(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let record = self.load(id).await?;
        access::require_owner(caller, &record, "delete this file")?;

        if !record.is_trashed() {
            return Err(AppError::InvalidState(
                "File must be in trash before permanent deletion".to_string(),
            ));
        }

        if let Err(e) = self.objects.delete_object(&record.storage_key).await {
            warn!(
                "Object cleanup failed for '{}', leaving an orphan: {}",
                record.storage_key, e
            );
        }

        if self.store.delete_trashed(id).await? {
            info!(
                "File permanently deleted: id={}, key={}",
                id, record.storage_key
            );
            Ok(())
        } else {
            Err(self.lost_race(id).await)
        }
    }

    /// Presigned GET for the file's object. Owner or permitted reader.
    pub async fn download_credential(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<DownloadUrlDto> {
        let record = self.load(id).await?;

        let access = access::resolve_read(caller, &record, self.store.as_ref()).await?;
        if !access.allows_read() {
            return Err(AppError::Forbidden(
                "You do not have permission to access this file".to_string(),
            ));
        }

        let url = self.objects.presign_get(&record.storage_key).await?;

        Ok(DownloadUrlDto {
            url,
            filename: record.original_filename,
            mime_type: record.mime_type,
            expires_in_secs: self.objects.presign_expiry_secs(),
        })
    }

    /// Caller's active files, newest effective date first.
    pub async fn list_active(&self, caller: &AuthenticatedUser) -> Result<Vec<FileResponseDto>> {
        let records = self.store.list_active(&caller.id).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Caller's trashed files with retention countdowns, most recently
    /// trashed first.
    pub async fn list_trashed(&self, caller: &AuthenticatedUser) -> Result<Vec<TrashedFileDto>> {
        let now = Utc::now();
        let records = self.store.list_trashed(&caller.id).await?;
        Ok(records
            .into_iter()
            .filter_map(|r| TrashedFileDto::project(r, self.trash_retention_days, now))
            .collect())
    }

    /// Trash several files at once. Each id is an independent transition;
    /// partial failure is reported, not rolled back.
    pub async fn bulk_soft_delete(
        &self,
        caller: &AuthenticatedUser,
        dto: BatchFileIdsDto,
    ) -> Result<BatchResultDto> {
        let ids = self.check_batch(dto)?;
        let outcomes = join_all(
            ids.iter()
                .map(|&id| async move { self.soft_delete(caller, id).await.map(|_| ()) }),
        )
        .await;
        Ok(collect_batch(ids, outcomes))
    }

    /// Restore several files at once.
    pub async fn bulk_restore(
        &self,
        caller: &AuthenticatedUser,
        dto: BatchFileIdsDto,
    ) -> Result<BatchResultDto> {
        let ids = self.check_batch(dto)?;
        let outcomes = join_all(
            ids.iter()
                .map(|&id| async move { self.restore(caller, id).await.map(|_| ()) }),
        )
        .await;
        Ok(collect_batch(ids, outcomes))
    }

    /// Permanently delete several trashed files at once.
    pub async fn bulk_purge(
        &self,
        caller: &AuthenticatedUser,
        dto: BatchFileIdsDto,
    ) -> Result<BatchResultDto> {
        let ids = self.check_batch(dto)?;
        let outcomes = join_all(ids.iter().map(|&id| self.purge(caller, id))).await;
        Ok(collect_batch(ids, outcomes))
    }

    async fn load(&self, id: Uuid) -> Result<FileRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// A conditional write matched no rows: the record changed under us
    /// between the ownership check and the write. Re-check to report the
    /// right kind; this is an expected outcome, not corruption.
    async fn lost_race(&self, id: Uuid) -> AppError {
        match self.store.find_by_id(id).await {
            Ok(Some(_)) => AppError::InvalidState("File changed state concurrently".to_string()),
            Ok(None) => AppError::NotFound("File not found".to_string()),
            Err(e) => e,
        }
    }

    fn check_batch(&self, dto: BatchFileIdsDto) -> Result<Vec<Uuid>> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if dto.ids.len() as u64 > MAX_BATCH_SIZE {
            return Err(AppError::Validation(format!(
                "A batch may contain at most {} ids",
                MAX_BATCH_SIZE
            )));
        }

        Ok(dto.ids)
    }
}

fn collect_batch(ids: Vec<Uuid>, outcomes: Vec<Result<()>>) -> BatchResultDto {
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for (id, outcome) in ids.into_iter().zip(outcomes) {
        match outcome {
            Ok(()) => succeeded.push(id),
            Err(e) => failed.push(BatchFailureDto {
                id,
                kind: (&e).into(),
                message: e.to_string(),
            }),
        }
    }

    BatchResultDto { succeeded, failed }
}
