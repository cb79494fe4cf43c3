use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    batch_purge, batch_restore, batch_trash, confirm_upload, get_download_url, list_files,
    list_trash, purge_file, request_upload, restore_file, soft_delete_file,
};
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route("/api/files", get(list_files))
        .route("/api/files/upload-request", post(request_upload))
        .route("/api/files/confirm-upload", post(confirm_upload))
        // Static segments must be registered alongside the {id} routes
        .route("/api/files/trash", get(list_trash))
        .route("/api/files/batch/trash", post(batch_trash))
        .route("/api/files/batch/restore", post(batch_restore))
        .route("/api/files/batch/purge", post(batch_purge))
        .route("/api/files/{id}", delete(soft_delete_file))
        .route("/api/files/{id}/restore", post(restore_file))
        .route("/api/files/{id}/permanent", delete(purge_file))
        .route("/api/files/{id}/download-url", get(get_download_url))
        .with_state(file_service)
}
