pub mod cli;
pub mod collab;
pub mod config;
pub mod core;
pub mod models;
pub mod selectors;
pub mod telemetry;
pub mod timing;

pub use config::{BackendKind, Config};
pub use crate::core::store::{AnyStore, StoreError, StoreResult, TodoStore};
pub use models::{Todo, TodoId, TodoList};
pub use selectors::{Filter, TodoCounts, TodoView};

#[cfg(feature = "gui")]
pub mod gui;
