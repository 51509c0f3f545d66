use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::models::{Todo, TodoList};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        };
        f.write_str(name)
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(anyhow::anyhow!(
                "Invalid filter `{}`, expected all|active|completed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub remaining: usize,
    pub completed: usize,
}

pub fn filter_todos(todos: &[Todo], filter: Filter) -> Vec<Todo> {
    todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .cloned()
        .collect()
}

pub fn calculate_counts(todos: &[Todo]) -> TodoCounts {
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoCounts {
        total: todos.len(),
        remaining: todos.len() - completed,
        completed,
    }
}

/// Footer text, e.g. "1 todo left" or "3 todos left".
pub fn items_left_label(remaining: usize) -> String {
    let word = if remaining == 1 { "todo" } else { "todos" };
    format!("{} {} left", remaining, word)
}

/// Filtered list and counts derived from one snapshot.
///
/// Only recomputed when the snapshot (by identity) or the filter changes.
#[derive(Debug, Clone)]
pub struct TodoView {
    source: TodoList,
    filter: Filter,
    visible: TodoList,
    counts: TodoCounts,
}

impl TodoView {
    pub fn new(source: TodoList, filter: Filter) -> Self {
        let visible = Arc::new(filter_todos(&source, filter));
        let counts = calculate_counts(&source);
        Self {
            source,
            filter,
            visible,
            counts,
        }
    }

    /// Returns `true` when anything had to be recomputed.
    pub fn refresh(&mut self, source: &TodoList, filter: Filter) -> bool {
        let same_source = Arc::ptr_eq(&self.source, source);
        if same_source && self.filter == filter {
            return false;
        }
        if !same_source {
            self.counts = calculate_counts(source);
            self.source = source.clone();
        }
        self.filter = filter;
        self.visible = Arc::new(filter_todos(&self.source, filter));
        true
    }

    pub fn source(&self) -> &TodoList {
        &self.source
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn visible(&self) -> &[Todo] {
        &self.visible
    }

    pub fn counts(&self) -> TodoCounts {
        self.counts
    }
}

impl Default for TodoView {
    fn default() -> Self {
        Self::new(Arc::new(Vec::new()), Filter::All)
    }
}
