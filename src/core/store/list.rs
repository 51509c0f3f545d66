use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::models::{Todo, TodoId, TodoList};

/// Fan-out of list snapshots to subscribers. Cloning shares the channel.
#[derive(Debug, Clone)]
pub(super) struct Publisher {
    sender: Arc<watch::Sender<TodoList>>,
}

impl Publisher {
    pub fn new(initial: TodoList) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, todos: TodoList) {
        self.sender.send_replace(todos);
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.sender.subscribe()
    }
}

/// Copy-on-write list owned by the memory and local backends.
#[derive(Debug)]
pub(super) struct ListState {
    todos: Mutex<TodoList>,
    publisher: Publisher,
}

impl ListState {
    pub fn new(todos: Vec<Todo>) -> Self {
        let todos = Arc::new(todos);
        Self {
            publisher: Publisher::new(todos.clone()),
            todos: Mutex::new(todos),
        }
    }

    pub fn snapshot(&self) -> TodoList {
        self.todos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.publisher.subscribe()
    }

    /// Applies `edit` to a copy of the list. When it reports a change the copy
    /// replaces the list, subscribers are notified and the new snapshot is
    /// returned.
    pub fn mutate(&self, edit: impl FnOnce(&mut Vec<Todo>) -> bool) -> Option<TodoList> {
        let mut todos = self.todos.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = todos.as_ref().clone();
        if !edit(&mut next) {
            return None;
        }
        let next = Arc::new(next);
        *todos = next.clone();
        self.publisher.publish(next.clone());
        Some(next)
    }
}

pub(super) fn push(todos: &mut Vec<Todo>, todo: Todo) -> bool {
    todos.push(todo);
    true
}

pub(super) fn remove(todos: &mut Vec<Todo>, id: TodoId) -> bool {
    match todos.iter().position(|todo| todo.id == id) {
        Some(index) => {
            todos.remove(index);
            true
        }
        None => false,
    }
}

pub(super) fn set_title(todos: &mut [Todo], id: TodoId, title: &str) -> bool {
    match todos.iter_mut().find(|todo| todo.id == id) {
        Some(todo) if todo.title != title => {
            todo.title = title.to_string();
            true
        }
        _ => false,
    }
}

pub(super) fn set_completed(todos: &mut [Todo], id: TodoId, completed: bool) -> bool {
    match todos.iter_mut().find(|todo| todo.id == id) {
        Some(todo) if todo.completed != completed => {
            todo.completed = completed;
            true
        }
        _ => false,
    }
}
