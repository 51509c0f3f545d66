use std::{path::PathBuf, time::Duration};

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::watch;

use crate::{
    config::LocalConfig,
    core::store::{
        StoreResult, TodoStore,
        list::{self, ListState},
    },
    models::{Todo, TodoId, TodoList},
    timing::Throttle,
};

#[derive(Debug, Clone)]
pub struct LocalStoreOptions {
    pub path: PathBuf,
    pub storage_key: String,
    pub save_throttle: Duration,
}

impl From<&LocalConfig> for LocalStoreOptions {
    fn from(config: &LocalConfig) -> Self {
        Self {
            path: config.path.clone(),
            storage_key: config.storage_key.clone(),
            save_throttle: config.save_throttle(),
        }
    }
}

/// Todos persisted as one JSON document in a SQLite key-value table.
///
/// Mutations are saved through a trailing throttle; call
/// [`close`](TodoStore::close) to write the final state.
#[derive(Debug)]
pub struct LocalStore {
    pool: SqlitePool,
    key: String,
    state: ListState,
    saver: Throttle<TodoList>,
}

impl LocalStore {
    /// Opens (creating if missing) the database file and reads the stored list.
    pub async fn open(options: LocalStoreOptions) -> StoreResult<Self> {
        let connect_opts = SqliteConnectOptions::new()
            .filename(&options.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let todos = read_todos(&pool, &options.storage_key)
            .await?
            .unwrap_or_default();
        tracing::info!(
            path = %options.path.display(),
            count = todos.len(),
            "opened local todo storage"
        );

        let saver = {
            let pool = pool.clone();
            let key = options.storage_key.clone();
            Throttle::new(options.save_throttle, move |todos: TodoList| {
                let pool = pool.clone();
                let key = key.clone();
                async move {
                    if let Err(err) = save_todos(&pool, &key, &todos).await {
                        tracing::error!(%err, "unable to store todos in local storage");
                    }
                }
            })
        };

        Ok(Self {
            pool,
            key: options.storage_key,
            state: ListState::new(todos),
            saver,
        })
    }

    fn changed(&self, todos: Option<TodoList>) {
        if let Some(todos) = todos {
            self.saver.call(todos);
        }
    }
}

impl TodoStore for LocalStore {
    async fn load(&self) -> StoreResult<TodoList> {
        Ok(self.state.snapshot())
    }

    fn list(&self) -> TodoList {
        self.state.snapshot()
    }

    fn add(&self, title: &str) -> StoreResult<TodoId> {
        let todo = Todo::new(title);
        let id = todo.id;
        self.changed(self.state.mutate(|todos| list::push(todos, todo)));
        Ok(id)
    }

    fn remove(&self, id: TodoId) -> StoreResult<()> {
        self.changed(self.state.mutate(|todos| list::remove(todos, id)));
        Ok(())
    }

    fn update_title(&self, id: TodoId, title: &str) -> StoreResult<()> {
        self.changed(self.state.mutate(|todos| list::set_title(todos, id, title)));
        Ok(())
    }

    fn update_completed(&self, id: TodoId, completed: bool) -> StoreResult<()> {
        self.changed(
            self.state
                .mutate(|todos| list::set_completed(todos, id, completed)),
        );
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.state.subscribe()
    }

    /// Drops any pending throttled save, waits for one already being written,
    /// then writes the current list and closes the connection pool. The store
    /// must not be used afterwards.
    async fn close(&self) -> StoreResult<()> {
        self.saver.shutdown().await;
        let todos = self.state.snapshot();
        save_todos(&self.pool, &self.key, &todos).await?;
        self.pool.close().await;
        tracing::info!(count = todos.len(), "closed local todo storage");
        Ok(())
    }
}

/// `None` when nothing is stored yet or the stored document is unreadable.
async fn read_todos(pool: &SqlitePool, key: &str) -> StoreResult<Option<Vec<Todo>>> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT value FROM local_storage WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    let Some(stored) = stored else {
        return Ok(None);
    };

    match serde_json::from_str(&stored) {
        Ok(todos) => Ok(Some(todos)),
        Err(err) => {
            tracing::error!(%err, key, "unable to read todos from local storage");
            Ok(None)
        }
    }
}

async fn save_todos(pool: &SqlitePool, key: &str, todos: &[Todo]) -> StoreResult<()> {
    let value = serde_json::to_string(todos)?;
    sqlx::query(
        r#"INSERT INTO local_storage (key, value) VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}
