//! Command-line surface of the `todo-dapp` binary.

use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{
    config::{BackendKind, Config},
    core::store::{AnyStore, TodoStore},
    models::{TitleEdit, Todo, find_by_prefix, normalize_new_title},
    selectors::{Filter, TodoView, calculate_counts, items_left_label},
};

#[derive(Debug, Parser)]
#[command(name = "todo-dapp")]
#[command(about = "Keep a todo list in memory, on disk or in a shared session")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./todo-dapp.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Store backend to use
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// SQLite file used by the local backend
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the todos matching a filter and the number left
    List {
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Add a todo and print its id
    Add { title: String },
    /// Rename a todo; an empty title removes it
    Edit { id: String, title: String },
    /// Mark a todo as completed
    Done { id: String },
    /// Mark a todo as active
    Undo { id: String },
    /// Remove a todo
    Rm { id: String },
    /// Complete every todo, or reactivate all when none are left
    ToggleAll,
    /// Remove completed todos
    ClearCompleted,
    /// Open the desktop app
    Gui,
}

impl Cli {
    /// Configuration from file and environment, with flags applied on top.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(db) = &self.db {
            config.local.path = db.clone();
        }
        Ok(config)
    }
}

/// Opens the configured store, runs `command` against it and closes it again.
pub async fn execute(command: &Command, config: &Config) -> anyhow::Result<()> {
    let store = AnyStore::open(config)
        .await
        .context("Failed to open todo store")?;
    store.load().await.context("Failed to load todos")?;

    let result = run(command, &store, &mut std::io::stdout().lock());
    store
        .close()
        .await
        .context("Failed to close todo store")?;
    result
}

/// Runs one command against a loaded store, writing its output to `out`.
pub fn run(command: &Command, store: &impl TodoStore, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::List { filter } => {
            let view = TodoView::new(store.list(), *filter);
            for todo in view.visible() {
                let mark = if todo.completed { "x" } else { " " };
                writeln!(out, "{} [{}] {}", todo.id, mark, todo.title)?;
            }
            if view.counts().total > 0 {
                writeln!(out, "{}", items_left_label(view.counts().remaining))?;
            }
        }
        Command::Add { title } => match normalize_new_title(title) {
            Some(title) => {
                let id = store.add(&title)?;
                writeln!(out, "{}", id)?;
            }
            None => tracing::warn!("ignoring empty title"),
        },
        Command::Edit { id, title } => {
            let todo = lookup(store, id)?;
            match TitleEdit::resolve(&todo.title, title) {
                TitleEdit::Unchanged => tracing::debug!(id = %todo.id, "title unchanged"),
                TitleEdit::Rename(title) => store.update_title(todo.id, &title)?,
                TitleEdit::Remove => store.remove(todo.id)?,
            }
        }
        Command::Done { id } => store.update_completed(lookup(store, id)?.id, true)?,
        Command::Undo { id } => store.update_completed(lookup(store, id)?.id, false)?,
        Command::Rm { id } => store.remove(lookup(store, id)?.id)?,
        Command::ToggleAll => {
            let remaining = calculate_counts(&store.list()).remaining;
            store.update_all_completed(remaining > 0)?;
        }
        Command::ClearCompleted => store.clear_completed()?,
        Command::Gui => anyhow::bail!("the gui command is not available here"),
    }
    Ok(())
}

fn lookup(store: &impl TodoStore, prefix: &str) -> anyhow::Result<Todo> {
    let todos = store.list();
    let todo = find_by_prefix(&todos, prefix)
        .with_context(|| format!("Cannot resolve todo `{}`", prefix))?;
    Ok(todo.clone())
}
