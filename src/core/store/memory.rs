use tokio::sync::watch;

use crate::{
    core::store::{
        StoreResult, TodoStore,
        list::{self, ListState},
    },
    models::{Todo, TodoId, TodoList, demo_todos},
};

/// Ephemeral store; everything is gone when it is dropped.
#[derive(Debug)]
pub struct MemoryStore {
    state: ListState,
}

impl MemoryStore {
    pub fn new(todos: Vec<Todo>) -> Self {
        Self {
            state: ListState::new(todos),
        }
    }

    pub fn with_demo_data() -> Self {
        Self::new(demo_todos())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TodoStore for MemoryStore {
    async fn load(&self) -> StoreResult<TodoList> {
        Ok(self.state.snapshot())
    }

    fn list(&self) -> TodoList {
        self.state.snapshot()
    }

    fn add(&self, title: &str) -> StoreResult<TodoId> {
        let todo = Todo::new(title);
        let id = todo.id;
        self.state.mutate(|todos| list::push(todos, todo));
        Ok(id)
    }

    fn remove(&self, id: TodoId) -> StoreResult<()> {
        if self.state.mutate(|todos| list::remove(todos, id)).is_none() {
            tracing::debug!(%id, "remove: no such todo");
        }
        Ok(())
    }

    fn update_title(&self, id: TodoId, title: &str) -> StoreResult<()> {
        self.state.mutate(|todos| list::set_title(todos, id, title));
        Ok(())
    }

    fn update_completed(&self, id: TodoId, completed: bool) -> StoreResult<()> {
        self.state
            .mutate(|todos| list::set_completed(todos, id, completed));
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.state.subscribe()
    }
}
