mod error;
mod list;

pub mod collab;
pub mod local;
pub mod memory;

use std::future::Future;

use tokio::sync::watch;

use crate::{
    collab::Network,
    config::{BackendKind, Config},
    models::{TodoId, TodoList},
};

pub use collab::{CollabStore, CollabStoreOptions};
pub use error::{StoreError, StoreResult};
pub use local::{LocalStore, LocalStoreOptions};
pub use memory::MemoryStore;

/// A todo list backend.
///
/// Mutations are applied synchronously and notify subscribers; operations on
/// unknown ids are no-ops. Titles are stored as given.
pub trait TodoStore: Send + Sync {
    /// Brings the store up and returns its current list.
    fn load(&self) -> impl Future<Output = StoreResult<TodoList>> + Send;

    fn list(&self) -> TodoList;

    fn add(&self, title: &str) -> StoreResult<TodoId>;

    fn remove(&self, id: TodoId) -> StoreResult<()>;

    fn update_title(&self, id: TodoId, title: &str) -> StoreResult<()>;

    fn update_completed(&self, id: TodoId, completed: bool) -> StoreResult<()>;

    /// Marks every todo as completed or active.
    fn update_all_completed(&self, completed: bool) -> StoreResult<()> {
        for todo in self.list().iter() {
            self.update_completed(todo.id, completed)?;
        }
        Ok(())
    }

    /// Removes every completed todo, last one first.
    fn clear_completed(&self) -> StoreResult<()> {
        for todo in self.list().iter().rev().filter(|todo| todo.completed) {
            self.remove(todo.id)?;
        }
        Ok(())
    }

    /// Receiver of list snapshots. Dropping it unsubscribes.
    fn subscribe(&self) -> watch::Receiver<TodoList>;

    /// Receiver of the number of connected peers, for backends that have any.
    fn subscribe_peers(&self) -> Option<watch::Receiver<usize>> {
        None
    }

    /// Flushes pending work and releases resources.
    fn close(&self) -> impl Future<Output = StoreResult<()>> + Send {
        async { Ok(()) }
    }
}

/// The backend selected by configuration.
pub enum AnyStore {
    Memory(MemoryStore),
    Local(LocalStore),
    Collab(CollabStore),
}

impl std::fmt::Debug for AnyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory(store) => std::fmt::Debug::fmt(store, f),
            Self::Local(store) => std::fmt::Debug::fmt(store, f),
            Self::Collab(store) => std::fmt::Debug::fmt(store, f),
        }
    }
}

impl AnyStore {
    /// Opens the configured backend. A collaboration backend gets a network of
    /// its own.
    pub async fn open(config: &Config) -> StoreResult<Self> {
        Self::open_with_network(config, Network::new()).await
    }

    pub async fn open_with_network(config: &Config, network: Network) -> StoreResult<Self> {
        let store = match config.backend {
            BackendKind::Memory if config.memory.seed_demo => {
                Self::Memory(MemoryStore::with_demo_data())
            }
            BackendKind::Memory => Self::Memory(MemoryStore::default()),
            BackendKind::Local => {
                Self::Local(LocalStore::open(LocalStoreOptions::from(&config.local)).await?)
            }
            BackendKind::Collab => Self::Collab(CollabStore::new(
                network,
                CollabStoreOptions::try_from(&config.collab)?,
            )),
        };
        tracing::debug!(backend = ?config.backend, "opened todo store");
        Ok(store)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory(_) => BackendKind::Memory,
            Self::Local(_) => BackendKind::Local,
            Self::Collab(_) => BackendKind::Collab,
        }
    }
}

impl TodoStore for AnyStore {
    async fn load(&self) -> StoreResult<TodoList> {
        match self {
            Self::Memory(store) => store.load().await,
            Self::Local(store) => store.load().await,
            Self::Collab(store) => store.load().await,
        }
    }

    fn list(&self) -> TodoList {
        match self {
            Self::Memory(store) => store.list(),
            Self::Local(store) => store.list(),
            Self::Collab(store) => store.list(),
        }
    }

    fn add(&self, title: &str) -> StoreResult<TodoId> {
        match self {
            Self::Memory(store) => store.add(title),
            Self::Local(store) => store.add(title),
            Self::Collab(store) => store.add(title),
        }
    }

    fn remove(&self, id: TodoId) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.remove(id),
            Self::Local(store) => store.remove(id),
            Self::Collab(store) => store.remove(id),
        }
    }

    fn update_title(&self, id: TodoId, title: &str) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.update_title(id, title),
            Self::Local(store) => store.update_title(id, title),
            Self::Collab(store) => store.update_title(id, title),
        }
    }

    fn update_completed(&self, id: TodoId, completed: bool) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.update_completed(id, completed),
            Self::Local(store) => store.update_completed(id, completed),
            Self::Collab(store) => store.update_completed(id, completed),
        }
    }

    fn subscribe(&self) -> watch::Receiver<TodoList> {
        match self {
            Self::Memory(store) => store.subscribe(),
            Self::Local(store) => store.subscribe(),
            Self::Collab(store) => store.subscribe(),
        }
    }

    fn subscribe_peers(&self) -> Option<watch::Receiver<usize>> {
        match self {
            Self::Memory(store) => store.subscribe_peers(),
            Self::Local(store) => store.subscribe_peers(),
            Self::Collab(store) => store.subscribe_peers(),
        }
    }

    async fn close(&self) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.close().await,
            Self::Local(store) => store.close().await,
            Self::Collab(store) => store.close().await,
        }
    }
}
