//! In-memory file store double for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord};

use super::FileStore;

#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<Uuid, FileRecord>>,
    grants: Mutex<HashSet<(Uuid, String)>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record access for assertions on untouched fields.
    pub fn get(&self, id: Uuid) -> Option<FileRecord> {
        self.files.lock().unwrap().get(&id).cloned()
    }

    pub fn insert_grant(&self, file_id: Uuid, user_id: &str) {
        self.grants
            .lock()
            .unwrap()
            .insert((file_id, user_id.to_string()));
    }

    pub fn grant_count_for(&self, file_id: Uuid) -> usize {
        self.grants
            .lock()
            .unwrap()
            .iter()
            .filter(|(f, _)| *f == file_id)
            .count()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(&record.id) {
            return Err(AppError::Conflict("Upload is already confirmed".to_string()));
        }

        let now = Utc::now();
        let stored = FileRecord {
            id: record.id,
            owner_id: record.owner_id,
            storage_key: record.storage_key,
            original_filename: record.original_filename,
            mime_type: record.mime_type,
            file_size: record.file_size,
            original_created_at: record.original_created_at,
            effective_date: record.effective_date,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        files.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn mark_trashed(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Option<FileRecord>> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(&id) {
            Some(record) if record.deleted_at.is_none() => {
                record.deleted_at = Some(deleted_at);
                record.updated_at = Utc::now();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_restored(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let mut files = self.files.lock().unwrap();
        match files.get_mut(&id) {
            Some(record) if record.deleted_at.is_some() => {
                record.deleted_at = None;
                record.updated_at = Utc::now();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_trashed(&self, id: Uuid) -> Result<bool> {
        let mut files = self.files.lock().unwrap();
        match files.get(&id) {
            Some(record) if record.deleted_at.is_some() => {
                files.remove(&id);
                // Cascade, as the FK does in Postgres
                self.grants.lock().unwrap().retain(|(f, _)| *f != id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_active(&self, owner_id: &str) -> Result<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id && r.deleted_at.is_none())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
        Ok(records)
    }

    async fn list_trashed(&self, owner_id: &str) -> Result<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .files
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.owner_id == owner_id && r.deleted_at.is_some())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(records)
    }

    async fn has_read_grant(&self, file_id: Uuid, user_id: &str) -> Result<bool> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .contains(&(file_id, user_id.to_string())))
    }
}
