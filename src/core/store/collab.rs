use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    collab::{Collaboration, CrdtKind, Network, PeerApp, PeerId, SharedArray, StateChanges},
    config::CollabConfig,
    core::store::{StoreError, StoreResult, TodoStore, list::Publisher},
    models::{Todo, TodoId, TodoList},
    timing::Debounce,
};

#[derive(Debug, Clone)]
pub struct CollabStoreOptions {
    pub app_name: String,
    pub collaboration: String,
    pub kind: CrdtKind,
    pub refresh_debounce: Duration,
}

impl TryFrom<&CollabConfig> for CollabStoreOptions {
    type Error = StoreError;

    fn try_from(config: &CollabConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            app_name: config.app_name.clone(),
            collaboration: config.collaboration.clone(),
            kind: config.crdt.parse()?,
            refresh_debounce: config.refresh_debounce(),
        })
    }
}

struct Joined {
    collaboration: Arc<Collaboration>,
    listeners: Vec<JoinHandle<()>>,
}

impl Joined {
    fn stop_listeners(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.abort();
        }
    }
}

impl Drop for Joined {
    fn drop(&mut self) {
        self.stop_listeners();
    }
}

/// Todos kept in a collaboration shared with other peers.
///
/// Changes made through this store reach subscribers right away; changes
/// from other peers are debounced.
pub struct CollabStore {
    app: PeerApp,
    options: CollabStoreOptions,
    publisher: Publisher,
    peers: Arc<watch::Sender<usize>>,
    joined: Mutex<Option<Joined>>,
}

impl std::fmt::Debug for CollabStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollabStore")
            .field("app", &self.app.name())
            .field("collaboration", &self.options.collaboration)
            .field("peer", &self.app.peer_id())
            .finish()
    }
}

impl CollabStore {
    pub fn new(network: Network, options: CollabStoreOptions) -> Self {
        let (peers, _) = watch::channel(0);
        Self {
            app: PeerApp::new(options.app_name.clone(), network),
            options,
            publisher: Publisher::new(Arc::default()),
            peers: Arc::new(peers),
            joined: Mutex::new(None),
        }
    }

    fn collaboration(&self) -> StoreResult<Arc<Collaboration>> {
        self.joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|joined| joined.collaboration.clone())
            .ok_or(StoreError::NotLoaded)
    }

    /// Subscribes before spawning so no change between load and the first
    /// poll of a listener is missed.
    fn spawn_listeners(&self, collaboration: &Arc<Collaboration>) -> Vec<JoinHandle<()>> {
        let wait = self.options.refresh_debounce;
        vec![
            tokio::spawn(listen_state_changes(
                collaboration.clone(),
                collaboration.state_changes(),
                self.publisher.clone(),
                wait,
            )),
            tokio::spawn(listen_membership(
                collaboration.membership(),
                self.peers.clone(),
                wait,
            )),
        ]
    }
}

impl TodoStore for CollabStore {
    /// Joins the collaboration on first call; later calls re-install the
    /// listeners on the same collaboration.
    async fn load(&self) -> StoreResult<TodoList> {
        let existing = self
            .joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|joined| joined.collaboration.clone());

        let collaboration = match existing {
            Some(collaboration) => collaboration,
            None => {
                self.app.start().await?;
                Arc::new(
                    self.app
                        .collaborate(&self.options.collaboration, self.options.kind)
                        .await?,
                )
            }
        };

        let todos: TodoList = Arc::new(todo_array(&collaboration).value());
        self.publisher.publish(todos.clone());
        self.peers.send_replace(collaboration.membership().borrow().len());

        let listeners = self.spawn_listeners(&collaboration);
        let previous = self
            .joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Joined {
                collaboration,
                listeners,
            });
        drop(previous);

        tracing::info!(
            collaboration = %self.options.collaboration,
            count = todos.len(),
            "loaded collaborative todos"
        );
        Ok(todos)
    }

    fn list(&self) -> TodoList {
        self.collaboration()
            .map(|collaboration| Arc::new(todo_array(&collaboration).value()))
            .unwrap_or_default()
    }

    fn add(&self, title: &str) -> StoreResult<TodoId> {
        let collaboration = self.collaboration()?;
        let todo = Todo::new(title);
        todo_array(&collaboration).push(&todo)?;
        Ok(todo.id)
    }

    fn remove(&self, id: TodoId) -> StoreResult<()> {
        let collaboration = self.collaboration()?;
        let todos = todo_array(&collaboration);
        match todos.find(|todo| todo.id == id) {
            Some((index, _)) => todos.remove_at(index)?,
            None => tracing::debug!(%id, "remove: no such todo"),
        }
        Ok(())
    }

    fn update_title(&self, id: TodoId, title: &str) -> StoreResult<()> {
        let collaboration = self.collaboration()?;
        let todos = todo_array(&collaboration);
        if let Some((index, todo)) = todos.find(|todo| todo.id == id) {
            if todo.title != title {
                todos.update_at(
                    index,
                    &Todo {
                        title: title.to_string(),
                        ..todo
                    },
                )?;
            }
        }
        Ok(())
    }

    fn update_completed(&self, id: TodoId, completed: bool) -> StoreResult<()> {
        let collaboration = self.collaboration()?;
        let todos = todo_array(&collaboration);
        if let Some((index, todo)) = todos.find(|todo| todo.id == id) {
            if todo.completed != completed {
                todos.update_at(index, &Todo { completed, ..todo })?;
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<TodoList> {
        self.publisher.subscribe()
    }

    fn subscribe_peers(&self) -> Option<watch::Receiver<usize>> {
        Some(self.peers.subscribe())
    }

    /// Stops listening and leaves the collaboration.
    async fn close(&self) -> StoreResult<()> {
        let joined = self
            .joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut joined) = joined {
            joined.stop_listeners();
            joined.collaboration.leave();
            tracing::info!(collaboration = %self.options.collaboration, "left collaborative todos");
        }
        Ok(())
    }
}

fn todo_array(collaboration: &Collaboration) -> SharedArray<'_, Todo> {
    collaboration.shared::<Todo>()
}

async fn listen_state_changes(
    collaboration: Arc<Collaboration>,
    mut changes: StateChanges,
    publisher: Publisher,
    wait: Duration,
) {
    let debounced = {
        let publisher = publisher.clone();
        Debounce::new(wait, move |todos: TodoList| {
            let publisher = publisher.clone();
            async move { publisher.publish(todos) }
        })
    };

    while let Some(change) = changes.recv().await {
        let todos: TodoList = Arc::new(todo_array(&collaboration).value());
        if change.from_self {
            publisher.publish(todos);
            debounced.cancel();
        } else {
            debounced.call(todos);
        }
    }
}

async fn listen_membership(
    mut members: watch::Receiver<BTreeSet<PeerId>>,
    peers: Arc<watch::Sender<usize>>,
    wait: Duration,
) {
    let debounced = Debounce::new(wait, move |count: usize| {
        let peers = peers.clone();
        async move {
            peers.send_replace(count);
        }
    });

    while members.changed().await.is_ok() {
        let count = members.borrow_and_update().len();
        debounced.call(count);
    }
}
