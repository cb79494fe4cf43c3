//! In-memory object store double for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::AppError;

use super::ObjectStore;

const TEST_EXPIRY_SECS: u32 = 3600;

pub struct MemoryObjectStore {
    deleted: Mutex<Vec<String>>,
    /// When set, delete_object fails, simulating an unreachable backend.
    fail_deletes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn presign_put(&self, key: &str, content_type: &str) -> Result<String, AppError> {
        Ok(format!(
            "https://objects.test/{}?verb=put&content-type={}&expires={}",
            key, content_type, TEST_EXPIRY_SECS
        ))
    }

    async fn presign_get(&self, key: &str) -> Result<String, AppError> {
        Ok(format!(
            "https://objects.test/{}?verb=get&expires={}",
            key, TEST_EXPIRY_SECS
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!(
                "Failed to delete object '{}': backend unreachable",
                key
            )));
        }
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn presign_expiry_secs(&self) -> u32 {
        TEST_EXPIRY_SECS
    }
}
