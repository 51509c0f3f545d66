mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from todo_dapp for tests
pub use todo_dapp::core::store::{
    AnyStore, CollabStore, CollabStoreOptions, LocalStore, LocalStoreOptions, MemoryStore,
    StoreError, TodoStore,
};
pub use todo_dapp::models::{Todo, TodoId, TodoList};
