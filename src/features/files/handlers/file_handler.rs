use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    BatchFileIdsDto, BatchResultDto, ConfirmUploadDto, DownloadUrlDto, FileResponseDto,
    TrashedFileDto, UploadRequestDto, UploadTicketDto,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, Meta};

/// Negotiate an upload
///
/// Returns a presigned PUT URL, a fresh file id and storage key, and the
/// metadata payload to echo back at confirmation. No record is created
/// until the upload is confirmed.
#[utoipa::path(
    post,
    path = "/api/files/upload-request",
    tag = "files",
    request_body = UploadRequestDto,
    responses(
        (status = 200, description = "Upload negotiated", body = ApiResponse<UploadTicketDto>),
        (status = 400, description = "Missing or malformed upload metadata"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_upload(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<UploadRequestDto>,
) -> Result<Json<ApiResponse<UploadTicketDto>>> {
    let ticket = service.request_upload(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(ticket), None, None)))
}

/// Confirm a completed upload
///
/// Registers the file record after the client finished the presigned PUT.
/// Confirming the same id twice fails with a conflict.
#[utoipa::path(
    post,
    path = "/api/files/confirm-upload",
    tag = "files",
    request_body = ConfirmUploadDto,
    responses(
        (status = 201, description = "File registered", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Malformed confirmation payload"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Upload already confirmed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn confirm_upload(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<ConfirmUploadDto>,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let file = service.confirm_upload(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(file), None, None)),
    ))
}

/// List the caller's active files
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Active files, newest effective date first", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let files = service.list_active(&user).await?;
    let total = files.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// List the caller's trashed files
///
/// Entries carry the retention countdown used by the trash view.
#[utoipa::path(
    get,
    path = "/api/files/trash",
    tag = "files",
    responses(
        (status = 200, description = "Trashed files, most recently trashed first", body = ApiResponse<Vec<TrashedFileDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_trash(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<TrashedFileDto>>>> {
    let files = service.list_trashed(&user).await?;
    let total = files.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Get a download credential
///
/// Owner or permitted reader only.
#[utoipa::path(
    get,
    path = "/api/files/{id}/download-url",
    tag = "files",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "Presigned download URL", body = ApiResponse<DownloadUrlDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not authorized to read this file"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_download_url(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DownloadUrlDto>>> {
    let credential = service.download_credential(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(credential), None, None)))
}

/// Move a file to trash
///
/// Owner only. Trashed files count down a retention window before they
/// can be permanently deleted.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File moved to trash", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Only the owner can delete"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File is already in trash")
    ),
    security(("bearer_auth" = []))
)]
pub async fn soft_delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.soft_delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(file),
        Some("File moved to trash".to_string()),
        None,
    )))
}

/// Restore a file from trash
#[utoipa::path(
    post,
    path = "/api/files/{id}/restore",
    tag = "files",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File restored", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Only the owner can restore"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File is not in trash")
    ),
    security(("bearer_auth" = []))
)]
pub async fn restore_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.restore(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(file),
        Some("File restored".to_string()),
        None,
    )))
}

/// Permanently delete a trashed file
///
/// Owner only, and only from trash; there is no direct path from active
/// to gone. Removes the record (and its read grants) and best-effort
/// deletes the backing object.
#[utoipa::path(
    delete,
    path = "/api/files/{id}/permanent",
    tag = "files",
    params(("id" = Uuid, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File permanently deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Only the owner can delete"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File must be in trash first")
    ),
    security(("bearer_auth" = []))
)]
pub async fn purge_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.purge(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("File permanently deleted".to_string()),
        None,
    )))
}

/// Trash several files
///
/// Each id is an independent transition; the response reports per-item
/// outcomes instead of rolling back.
#[utoipa::path(
    post,
    path = "/api/files/batch/trash",
    tag = "files",
    request_body = BatchFileIdsDto,
    responses(
        (status = 200, description = "Per-item outcomes", body = ApiResponse<BatchResultDto>),
        (status = 400, description = "Empty or oversized batch"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn batch_trash(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<BatchFileIdsDto>,
) -> Result<Json<ApiResponse<BatchResultDto>>> {
    let result = service.bulk_soft_delete(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Restore several files
#[utoipa::path(
    post,
    path = "/api/files/batch/restore",
    tag = "files",
    request_body = BatchFileIdsDto,
    responses(
        (status = 200, description = "Per-item outcomes", body = ApiResponse<BatchResultDto>),
        (status = 400, description = "Empty or oversized batch"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn batch_restore(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<BatchFileIdsDto>,
) -> Result<Json<ApiResponse<BatchResultDto>>> {
    let result = service.bulk_restore(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Permanently delete several trashed files
#[utoipa::path(
    post,
    path = "/api/files/batch/purge",
    tag = "files",
    request_body = BatchFileIdsDto,
    responses(
        (status = 200, description = "Per-item outcomes", body = ApiResponse<BatchResultDto>),
        (status = 400, description = "Empty or oversized batch"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn batch_purge(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<BatchFileIdsDto>,
) -> Result<Json<ApiResponse<BatchResultDto>>> {
    let result = service.bulk_purge(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::features::files::routes::routes;
    use crate::features::files::services::FileService;
    use crate::features::files::store::memory::MemoryFileStore;
    use crate::modules::storage::memory::MemoryObjectStore;
    use crate::shared::test_helpers::{test_user, with_user_auth};

    fn test_router() -> Router {
        let store = Arc::new(MemoryFileStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let service = Arc::new(FileService::new(store, objects, "vault".to_string(), 30));
        with_user_auth(routes(service), test_user())
    }

    #[tokio::test]
    async fn test_unknown_file_maps_to_not_found_envelope() {
        let server = TestServer::new(test_router()).unwrap();

        let response = server
            .delete(&format!("/api/files/{}", Uuid::new_v4()))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("File not found"));
    }

    #[tokio::test]
    async fn test_missing_metadata_maps_to_bad_request() {
        let server = TestServer::new(test_router()).unwrap();

        let response = server
            .post("/api/files/upload-request")
            .json(&json!({
                "filename": "",
                "mime_type": "image/jpeg",
                "file_size": 2048
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_trash_restore_walk() {
        let server = TestServer::new(test_router()).unwrap();

        // Negotiate
        let response = server
            .post("/api/files/upload-request")
            .json(&json!({
                "filename": "IMG_0001.jpg",
                "mime_type": "image/jpeg",
                "file_size": 2048
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let ticket: Value = response.json();
        let file_id = ticket["data"]["file_id"].as_str().unwrap().to_string();

        // Confirm
        let response = server
            .post("/api/files/confirm-upload")
            .json(&json!({
                "file_id": file_id,
                "storage_key": ticket["data"]["storage_key"],
                "metadata": ticket["data"]["metadata"],
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        // Listed as active
        let body: Value = server.get("/api/files").await.json();
        assert_eq!(body["meta"]["total"], json!(1));
        assert_eq!(body["data"][0]["id"].as_str().unwrap(), file_id);

        // Trash it
        let response = server.delete(&format!("/api/files/{}", file_id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = server.get("/api/files").await.json();
        assert_eq!(body["meta"]["total"], json!(0));

        let body: Value = server.get("/api/files/trash").await.json();
        assert_eq!(body["meta"]["total"], json!(1));
        assert_eq!(body["data"][0]["days_left"], json!(30));

        // Trashing again is a state error, not a no-op
        let response = server.delete(&format!("/api/files/{}", file_id)).await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);

        // Restore brings it back
        let response = server
            .post(&format!("/api/files/{}/restore", file_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = server.get("/api/files").await.json();
        assert_eq!(body["data"][0]["id"].as_str().unwrap(), file_id);
    }

    #[tokio::test]
    async fn test_purge_requires_trash_over_http() {
        let server = TestServer::new(test_router()).unwrap();

        let response = server
            .post("/api/files/upload-request")
            .json(&json!({
                "filename": "IMG_0002.jpg",
                "mime_type": "image/png",
                "file_size": 4096
            }))
            .await;
        let ticket: Value = response.json();
        let file_id = ticket["data"]["file_id"].as_str().unwrap().to_string();

        server
            .post("/api/files/confirm-upload")
            .json(&json!({
                "file_id": file_id,
                "storage_key": ticket["data"]["storage_key"],
                "metadata": ticket["data"]["metadata"],
            }))
            .await;

        // Active file cannot be purged directly
        let response = server
            .delete(&format!("/api/files/{}/permanent", file_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);

        // Two-step flow works
        server.delete(&format!("/api/files/{}", file_id)).await;
        let response = server
            .delete(&format!("/api/files/{}/permanent", file_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        // Gone for good
        let response = server
            .get(&format!("/api/files/{}/download-url", file_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
