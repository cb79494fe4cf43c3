//! Object storage for vault files
//!
//! All vault objects are private; clients never talk to the bucket with
//! standing credentials. Access happens through short-lived presigned URLs
//! issued here, scoped to a single key and verb.

use async_trait::async_trait;

use crate::core::error::AppError;

mod s3_client;

#[cfg(test)]
pub mod memory;

pub use s3_client::S3ObjectStore;

/// Seam over the S3-compatible backend.
///
/// The production implementation is [`S3ObjectStore`]; tests use an
/// in-memory double.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Presign a PUT for exactly `key`. The declared content type is what
    /// the uploader promised; the client must send it with the PUT.
    async fn presign_put(&self, key: &str, content_type: &str) -> Result<String, AppError>;

    /// Presign a GET for `key`.
    async fn presign_get(&self, key: &str) -> Result<String, AppError>;

    /// Delete the object at `key`.
    async fn delete_object(&self, key: &str) -> Result<(), AppError>;

    /// Lifetime of issued presigned URLs in seconds.
    fn presign_expiry_secs(&self) -> u32;
}
