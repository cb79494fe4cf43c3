use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::files::models::FileRecord;
use crate::shared::validation::MIME_TYPE_REGEX;

/// Request DTO for negotiating an upload.
///
/// All three descriptive fields are required; `captured_at` is the
/// best-effort capture timestamp the client extracted from embedded
/// metadata, absent when extraction failed or found nothing.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadRequestDto {
    #[validate(length(min = 1, max = 255, message = "filename is required"))]
    pub filename: String,
    #[validate(regex(
        path = *MIME_TYPE_REGEX,
        message = "mime_type must be a bare type/subtype token"
    ))]
    pub mime_type: String,
    #[validate(range(min = 1, message = "file_size must be a positive byte count"))]
    pub file_size: i64,
    #[schema(example = "2026-01-15T09:30:00Z")]
    pub captured_at: Option<DateTime<Utc>>,
}

/// Metadata the client echoes back unchanged at confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadMetadataDto {
    #[validate(length(min = 1, max = 255, message = "original_filename is required"))]
    pub original_filename: String,
    #[validate(regex(
        path = *MIME_TYPE_REGEX,
        message = "mime_type must be a bare type/subtype token"
    ))]
    pub mime_type: String,
    #[validate(range(min = 1, message = "file_size must be a positive byte count"))]
    pub file_size: i64,
    pub original_created_at: Option<DateTime<Utc>>,
    pub effective_date: DateTime<Utc>,
}

/// Response DTO for a negotiated upload: where to PUT the bytes, and what
/// to send back to `confirm-upload`. Nothing is persisted yet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadTicketDto {
    /// Presigned PUT URL scoped to the storage key
    pub upload_url: String,
    pub file_id: Uuid,
    pub storage_key: String,
    /// Seconds until the upload URL expires
    pub expires_in_secs: u32,
    pub metadata: UploadMetadataDto,
}

/// Request DTO confirming a completed object-store write.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmUploadDto {
    pub file_id: Uuid,
    #[validate(length(min = 1, message = "storage_key is required"))]
    pub storage_key: String,
    #[validate(nested)]
    pub metadata: UploadMetadataDto,
}

/// Response DTO for file records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Unique identifier for the file
    pub id: Uuid,
    /// Original filename as uploaded
    pub original_filename: String,
    /// MIME type of the file
    pub mime_type: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Capture timestamp from embedded metadata, if known
    pub original_created_at: Option<DateTime<Utc>>,
    /// Date used for chronological grouping (capture date, else upload time)
    pub effective_date: DateTime<Utc>,
    /// Set while the file sits in trash
    pub deleted_at: Option<DateTime<Utc>>,
    /// Timestamp when the upload was confirmed
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            original_filename: record.original_filename,
            mime_type: record.mime_type,
            file_size: record.file_size,
            original_created_at: record.original_created_at,
            effective_date: record.effective_date,
            deleted_at: record.deleted_at,
            created_at: record.created_at,
        }
    }
}

/// Trash listing entry with the retention countdown.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrashedFileDto {
    pub id: Uuid,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub effective_date: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
    /// When the file becomes eligible for permanent deletion
    pub expires_at: DateTime<Utc>,
    /// Whole days until expiry, floored at 0
    pub days_left: i64,
}

impl TrashedFileDto {
    /// Project a trashed record for display. None for active records,
    /// which have no countdown.
    pub fn project(record: FileRecord, retention_days: i64, now: DateTime<Utc>) -> Option<Self> {
        let deleted_at = record.deleted_at?;
        Some(Self {
            id: record.id,
            original_filename: record.original_filename,
            mime_type: record.mime_type,
            file_size: record.file_size,
            effective_date: record.effective_date,
            deleted_at,
            expires_at: crate::features::files::models::expires_at(deleted_at, retention_days),
            days_left: crate::features::files::models::days_left(deleted_at, retention_days, now),
        })
    }
}

/// Response DTO for a download credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadUrlDto {
    /// Presigned GET URL
    pub url: String,
    pub filename: String,
    pub mime_type: String,
    /// Seconds until the URL expires
    pub expires_in_secs: u32,
}

/// Request DTO for batch lifecycle operations.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchFileIdsDto {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<Uuid>,
}

/// Per-item failure kind, so bulk callers can tell a stale id from a
/// denied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailureKind {
    NotFound,
    Forbidden,
    InvalidState,
    Upstream,
}

impl From<&AppError> for BatchFailureKind {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::NotFound(_) => Self::NotFound,
            AppError::Forbidden(_) => Self::Forbidden,
            AppError::InvalidState(_) => Self::InvalidState,
            _ => Self::Upstream,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchFailureDto {
    pub id: Uuid,
    pub kind: BatchFailureKind,
    pub message: String,
}

/// Response DTO for batch operations. Partial failure is the expected
/// shape; nothing is rolled back.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchResultDto {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<BatchFailureDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_failure_kind_mapping() {
        assert_eq!(
            BatchFailureKind::from(&AppError::NotFound("x".into())),
            BatchFailureKind::NotFound
        );
        assert_eq!(
            BatchFailureKind::from(&AppError::Forbidden("x".into())),
            BatchFailureKind::Forbidden
        );
        assert_eq!(
            BatchFailureKind::from(&AppError::InvalidState("x".into())),
            BatchFailureKind::InvalidState
        );
        assert_eq!(
            BatchFailureKind::from(&AppError::Storage("x".into())),
            BatchFailureKind::Upstream
        );
    }

    #[test]
    fn test_upload_request_rejects_missing_fields() {
        let dto = UploadRequestDto {
            filename: "".to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 1024,
            captured_at: None,
        };
        assert!(dto.validate().is_err());

        let dto = UploadRequestDto {
            filename: "IMG_0001.jpg".to_string(),
            mime_type: "not a mime type".to_string(),
            file_size: 1024,
            captured_at: None,
        };
        assert!(dto.validate().is_err());

        let dto = UploadRequestDto {
            filename: "IMG_0001.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 0,
            captured_at: None,
        };
        assert!(dto.validate().is_err());
    }
}
