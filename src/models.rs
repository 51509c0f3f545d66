use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TodoId = Uuid;

/// Immutable snapshot of the list handed to subscribers and views.
pub type TodoList = Arc<Vec<Todo>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Create an active todo with a freshly generated id
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, false)
    }

    pub fn with_id(id: TodoId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}

/// Outcome of committing an inline title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleEdit {
    Unchanged,
    Rename(String),
    Remove,
}

impl TitleEdit {
    /// An edit trimmed down to nothing removes the todo.
    pub fn resolve(current: &str, raw: &str) -> Self {
        let title = raw.trim();
        if title == current {
            TitleEdit::Unchanged
        } else if title.is_empty() {
            TitleEdit::Remove
        } else {
            TitleEdit::Rename(title.to_string())
        }
    }
}

/// Trim the text of a new todo, rejecting blank input.
pub fn normalize_new_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("todo id prefix must not be empty")]
    EmptyPrefix,
    #[error("no todo matches `{0}`")]
    NotFound(String),
    #[error("`{prefix}` matches {count} todos, use a longer prefix")]
    Ambiguous { prefix: String, count: usize },
}

/// Resolve a todo from a prefix of its id, hyphenated or not.
pub fn find_by_prefix<'a>(todos: &'a [Todo], prefix: &str) -> Result<&'a Todo, LookupError> {
    let needle = prefix.trim().to_ascii_lowercase();
    let simple_needle = needle.replace('-', "");
    if simple_needle.is_empty() {
        return Err(LookupError::EmptyPrefix);
    }

    let mut matches = todos.iter().filter(|todo| {
        todo.id.hyphenated().to_string().starts_with(&needle)
            || todo.id.simple().to_string().starts_with(&simple_needle)
    });

    match (matches.next(), matches.count()) {
        (None, _) => Err(LookupError::NotFound(needle)),
        (Some(todo), 0) => Ok(todo),
        (Some(_), rest) => Err(LookupError::Ambiguous {
            prefix: needle,
            count: rest + 1,
        }),
    }
}

/// Fixed demo list shown by the in-memory backend.
pub fn demo_todos() -> Vec<Todo> {
    vec![
        Todo::with_id(demo_id(1), "Buy candies", false),
        Todo::with_id(demo_id(2), "Finish DApp", true),
        Todo::with_id(demo_id(3), "Finish presentation", false),
    ]
}

fn demo_id(n: u128) -> TodoId {
    Uuid::from_u128(n)
}
