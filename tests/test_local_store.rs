//! Integration tests for the SQLite-backed local store.
//!
//! Tests cover:
//! - Starting empty on a fresh file
//! - Persistence through close/reopen cycles
//! - Throttled saves reaching disk without an explicit close
//! - Recovery from an unreadable stored document
//! - Close winning over a throttled save still being written

mod common;

use std::time::Duration;

use common::*;

#[tokio::test]
async fn test_fresh_store_is_empty() -> anyhow::Result<()> {
    let (store, _temp_dir) = create_local_store().await;

    let todos = store.load().await?;
    assert!(todos.is_empty());
    assert!(store.subscribe_peers().is_none());

    store.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_todos_survive_reopen() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;

    let store = LocalStore::open(local_options(dir.path())).await?;
    let milk = store.add("Buy milk")?;
    store.add("Call mum")?;
    store.update_completed(milk, true)?;
    store.close().await?;
    drop(store);

    let reopened = LocalStore::open(local_options(dir.path())).await?;
    let todos = reopened.load().await?;
    assert_eq!(titles(&todos), vec!["Buy milk", "Call mum"]);
    assert_eq!(todos[0].id, milk);
    assert!(todos[0].completed);
    assert!(!todos[1].completed);

    reopened.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_throttled_save_without_close() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let store = LocalStore::open(local_options(dir.path())).await?;

    store.add("first")?;
    store.add("second")?;
    store.add("third")?;
    tokio::time::sleep(TEST_SAVE_THROTTLE * 6).await;

    let observer = LocalStore::open(local_options(dir.path())).await?;
    assert_eq!(
        titles(&observer.load().await?),
        vec!["first", "second", "third"]
    );

    observer.close().await?;
    store.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_subscribers_are_notified_before_save() -> anyhow::Result<()> {
    let (store, _temp_dir) = create_local_store().await;
    let mut rx = store.subscribe();

    let id = store.add("Notify me")?;

    assert!(rx.has_changed()?);
    assert_eq!(rx.borrow_and_update()[0].id, id);
    store.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_corrupt_document_loads_empty() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let options = local_options(dir.path());

    let store = LocalStore::open(options.clone()).await?;
    store.add("will be lost")?;
    store.close().await?;
    drop(store);

    write_raw_document(&options.path, &options.storage_key, "{ not json").await?;

    let reopened = LocalStore::open(options.clone()).await?;
    assert!(reopened.load().await?.is_empty());

    reopened.add("fresh start")?;
    reopened.close().await?;
    drop(reopened);

    let again = LocalStore::open(options).await?;
    assert_eq!(titles(&again.load().await?), vec!["fresh start"]);
    again.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_storage_keys_are_isolated() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let work = LocalStoreOptions {
        storage_key: "work-todos".to_string(),
        ..local_options(dir.path())
    };

    let store = LocalStore::open(work.clone()).await?;
    store.add("Quarterly report")?;
    store.close().await?;

    let default = LocalStore::open(local_options(dir.path())).await?;
    assert!(default.load().await?.is_empty());
    default.close().await?;

    let reopened = LocalStore::open(work).await?;
    assert_eq!(titles(&reopened.load().await?), vec!["Quarterly report"]);
    reopened.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_close_flushes_pending_save() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let options = LocalStoreOptions {
        save_throttle: Duration::from_secs(3600),
        ..local_options(dir.path())
    };

    let store = LocalStore::open(options.clone()).await?;
    store.add("flushed on close")?;
    store.close().await?;
    drop(store);

    let reopened = LocalStore::open(options).await?;
    assert_eq!(titles(&reopened.load().await?), vec!["flushed on close"]);
    reopened.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_close_wins_over_in_flight_save() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;

    for round in 0..30 {
        let options = LocalStoreOptions {
            storage_key: format!("round-{}", round),
            save_throttle: Duration::from_millis(5),
            ..local_options(dir.path())
        };

        let store = LocalStore::open(options.clone()).await?;
        for n in 0..200 {
            store.add(&format!("item {}", n))?;
        }
        // Lands close to the moment the throttled save starts writing.
        tokio::time::sleep(options.save_throttle).await;
        store.add("last")?;
        store.close().await?;
        drop(store);

        let reopened = LocalStore::open(options).await?;
        let todos = reopened.load().await?;
        assert_eq!(todos.len(), 201, "round {} kept a stale list", round);
        assert_eq!(todos[200].title, "last");
        reopened.close().await?;
    }
    Ok(())
}
