use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("archived conversation not found: {0}")]
    ArchiveNotFound(i64),

    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Core(#[from] parley_core::error::CoreError),

    #[error("storage error: {0}")]
    Storage(#[from] parley_storage::error::StorageError),
}
