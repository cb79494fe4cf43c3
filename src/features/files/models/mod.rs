mod file;
mod file_permission;

pub use file::{days_left, expires_at, storage_key_for, FileRecord, NewFileRecord};
pub use file_permission::FilePermission;
