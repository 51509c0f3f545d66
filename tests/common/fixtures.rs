use std::{path::Path, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use todo_dapp::{
    collab::{CrdtKind, Network},
    core::store::{CollabStore, CollabStoreOptions, LocalStore, LocalStoreOptions},
    models::Todo,
};

/// Throttle window used by local store tests, short enough to wait out.
pub const TEST_SAVE_THROTTLE: Duration = Duration::from_millis(50);

/// Debounce window used by collaboration tests (which run on paused time).
pub const TEST_REFRESH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Local store options pointing at `todos.db` inside `dir`.
pub fn local_options(dir: &Path) -> LocalStoreOptions {
    LocalStoreOptions {
        path: dir.join("todos.db"),
        storage_key: "dapp-todos".to_string(),
        save_throttle: TEST_SAVE_THROTTLE,
    }
}

/// Creates a LocalStore in a fresh temp directory.
/// Returns both the store and the temp directory (which must be kept alive).
pub async fn create_local_store() -> (LocalStore, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let store = LocalStore::open(local_options(dir.path()))
        .await
        .expect("Failed to open local store");
    (store, dir)
}

/// Overwrites the stored document for `key`, bypassing the store.
pub async fn write_raw_document(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(path))
        .await?;
    sqlx::query(
        r#"INSERT INTO local_storage (key, value) VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
    )
    .bind(key)
    .bind(value)
    .execute(&pool)
    .await?;
    pool.close().await;
    Ok(())
}

pub fn collab_options() -> CollabStoreOptions {
    CollabStoreOptions {
        app_name: "todo-dapp".to_string(),
        collaboration: "todos".to_string(),
        kind: CrdtKind::Rga,
        refresh_debounce: TEST_REFRESH_DEBOUNCE,
    }
}

/// Two collaboration stores meeting on one network, not yet loaded.
pub fn collab_pair() -> (CollabStore, CollabStore, Network) {
    let network = Network::new();
    (
        CollabStore::new(network.clone(), collab_options()),
        CollabStore::new(network.clone(), collab_options()),
        network,
    )
}

pub fn titles(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|todo| todo.title.as_str()).collect()
}
