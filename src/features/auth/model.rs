use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity resolved from a validated access token.
///
/// Every file operation takes this value explicitly; nothing reads an
/// ambient "current user".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject claim of the token; owner ids in file records are this value.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
