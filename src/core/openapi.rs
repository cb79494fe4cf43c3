use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Files
        files_handlers::request_upload,
        files_handlers::confirm_upload,
        files_handlers::list_files,
        files_handlers::list_trash,
        files_handlers::get_download_url,
        files_handlers::soft_delete_file,
        files_handlers::restore_file,
        files_handlers::purge_file,
        files_handlers::batch_trash,
        files_handlers::batch_restore,
        files_handlers::batch_purge,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            // Files
            files_dtos::UploadRequestDto,
            files_dtos::UploadMetadataDto,
            files_dtos::UploadTicketDto,
            files_dtos::ConfirmUploadDto,
            files_dtos::FileResponseDto,
            files_dtos::TrashedFileDto,
            files_dtos::DownloadUrlDto,
            files_dtos::BatchFileIdsDto,
            files_dtos::BatchFailureKind,
            files_dtos::BatchFailureDto,
            files_dtos::BatchResultDto,
            ApiResponse<files_dtos::UploadTicketDto>,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<Vec<files_dtos::TrashedFileDto>>,
            ApiResponse<files_dtos::DownloadUrlDto>,
            ApiResponse<files_dtos::BatchResultDto>,
        )
    ),
    tags(
        (name = "files", description = "Upload negotiation and trash lifecycle"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CloudVault API",
        version = "0.1.0",
        description = "API documentation for CloudVault",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
