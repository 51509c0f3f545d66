use crate::collab::CollabError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo store has not been loaded")]
    NotLoaded,
    #[error("local storage failure: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("local storage migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to encode todos: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Collab(#[from] CollabError),
}
