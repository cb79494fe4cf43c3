pub mod file_handler;

pub use file_handler::{
    __path_batch_purge, __path_batch_restore, __path_batch_trash, __path_confirm_upload,
    __path_get_download_url, __path_list_files, __path_list_trash, __path_purge_file,
    __path_request_upload, __path_restore_file, __path_soft_delete_file, batch_purge,
    batch_restore, batch_trash, confirm_upload, get_download_url, list_files, list_trash,
    purge_file, request_upload, restore_file, soft_delete_file,
};
