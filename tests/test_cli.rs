//! Tests for command parsing and execution against a store.

mod common;

use clap::Parser;
use common::*;
use todo_dapp::{
    cli::{Cli, Command, run},
    config::BackendKind,
    selectors::Filter,
};
use uuid::Uuid;

fn run_to_string(command: Command, store: &impl TodoStore) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(&command, store, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn demo_id(n: u128) -> String {
    Uuid::from_u128(n).to_string()
}

#[test]
fn test_parse_global_flags_and_subcommands() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
        "todo-dapp", "--backend", "memory", "-vv", "list", "--filter", "active",
    ])?;
    assert_eq!(cli.backend, Some(BackendKind::Memory));
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Command::List { filter: Filter::Active }));

    let cli = Cli::try_parse_from(["todo-dapp", "clear-completed"])?;
    assert!(matches!(cli.command, Command::ClearCompleted));

    let cli = Cli::try_parse_from(["todo-dapp", "list"])?;
    assert!(matches!(cli.command, Command::List { filter: Filter::All }));

    assert!(Cli::try_parse_from(["todo-dapp", "list", "--filter", "someday"]).is_err());
    Ok(())
}

#[test]
fn test_flags_override_config() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config_path = dir.path().join("todo-dapp.toml");
    std::fs::write(&config_path, "backend = \"collab\"\n[local]\npath = \"from-file.db\"\n")?;
    let config_arg = config_path.to_str().expect("temp path is utf-8");

    let cli = Cli::try_parse_from(["todo-dapp", "--config", config_arg, "list"])?;
    let config = cli.load_config()?;
    assert_eq!(config.local.path, std::path::PathBuf::from("from-file.db"));

    let cli = Cli::try_parse_from([
        "todo-dapp", "--config", config_arg, "--backend", "memory", "--db", "flag.db", "list",
    ])?;
    let config = cli.load_config()?;
    assert_eq!(config.backend, BackendKind::Memory);
    assert_eq!(config.local.path, std::path::PathBuf::from("flag.db"));
    Ok(())
}

#[test]
fn test_list_prints_visible_todos_and_footer() -> anyhow::Result<()> {
    let store = MemoryStore::with_demo_data();

    let all = run_to_string(Command::List { filter: Filter::All }, &store)?;
    let lines: Vec<&str> = all.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], format!("{} [ ] Buy candies", demo_id(1)));
    assert_eq!(lines[1], format!("{} [x] Finish DApp", demo_id(2)));
    assert_eq!(lines[3], "2 todos left");

    let completed = run_to_string(Command::List { filter: Filter::Completed }, &store)?;
    assert_eq!(completed.lines().count(), 2);
    assert!(completed.contains("Finish DApp"));

    let empty = run_to_string(Command::List { filter: Filter::All }, &MemoryStore::default())?;
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn test_add_trims_and_ignores_blank_titles() -> anyhow::Result<()> {
    let store = MemoryStore::default();

    let printed = run_to_string(Command::Add { title: "  Water plants ".to_string() }, &store)?;
    let id: Uuid = printed.trim().parse()?;
    assert_eq!(store.list()[0].id, id);
    assert_eq!(store.list()[0].title, "Water plants");

    let printed = run_to_string(Command::Add { title: "   ".to_string() }, &store)?;
    assert!(printed.is_empty());
    assert_eq!(store.list().len(), 1);
    Ok(())
}

#[test]
fn test_edit_follows_title_rules() -> anyhow::Result<()> {
    let store = MemoryStore::with_demo_data();

    run_to_string(
        Command::Edit { id: demo_id(1), title: " Buy chocolate ".to_string() },
        &store,
    )?;
    assert_eq!(store.list()[0].title, "Buy chocolate");

    run_to_string(Command::Edit { id: demo_id(1), title: " ".to_string() }, &store)?;
    assert_eq!(titles(&store.list()), vec!["Finish DApp", "Finish presentation"]);
    Ok(())
}

#[test]
fn test_done_undo_rm_by_prefix() -> anyhow::Result<()> {
    let store = MemoryStore::default();
    let id = store.add("Prefixed")?;
    let prefix = id.to_string()[..6].to_string();

    run_to_string(Command::Done { id: prefix.clone() }, &store)?;
    assert!(store.list()[0].completed);

    run_to_string(Command::Undo { id: prefix.to_uppercase() }, &store)?;
    assert!(!store.list()[0].completed);

    run_to_string(Command::Rm { id: prefix }, &store)?;
    assert!(store.list().is_empty());
    Ok(())
}

#[test]
fn test_unresolvable_ids_are_errors() -> anyhow::Result<()> {
    let store = MemoryStore::with_demo_data();

    // All demo ids share their leading zeros.
    let err = run_to_string(Command::Done { id: "0000".to_string() }, &store).unwrap_err();
    assert!(format!("{:#}", err).contains("matches 3 todos"));

    let err = run_to_string(Command::Rm { id: "ffff".to_string() }, &store).unwrap_err();
    assert!(format!("{:#}", err).contains("no todo matches"));
    assert_eq!(store.list().len(), 3);
    Ok(())
}

#[test]
fn test_toggle_all_and_clear_completed() -> anyhow::Result<()> {
    let store = MemoryStore::with_demo_data();

    run_to_string(Command::ToggleAll, &store)?;
    assert!(store.list().iter().all(|todo| todo.completed));

    run_to_string(Command::ToggleAll, &store)?;
    assert!(store.list().iter().all(|todo| !todo.completed));

    store.update_completed(Uuid::from_u128(3), true)?;
    run_to_string(Command::ClearCompleted, &store)?;
    assert_eq!(titles(&store.list()), vec!["Buy candies", "Finish DApp"]);
    Ok(())
}
