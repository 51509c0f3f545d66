use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;
use tokio::sync::{broadcast, watch};

use crate::collab::{CollabError, PeerId};

const STATE_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct SessionKey {
    pub app: String,
    pub collaboration: String,
}

/// Event emitted to every replica after the shared value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Change {
    pub origin: PeerId,
}

/// One replicated array.
///
/// All operations take the same lock, so every replica observes the same
/// order of operations.
#[derive(Debug)]
pub(super) struct Session {
    items: Mutex<Vec<Value>>,
    changes: broadcast::Sender<Change>,
    members: watch::Sender<BTreeSet<PeerId>>,
}

impl Session {
    fn new() -> Self {
        let (changes, _) = broadcast::channel(STATE_EVENT_CAPACITY);
        let (members, _) = watch::channel(BTreeSet::new());
        Self {
            items: Mutex::new(Vec::new()),
            changes,
            members,
        }
    }

    fn items(&self) -> MutexGuard<'_, Vec<Value>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn value(&self) -> Vec<Value> {
        self.items().clone()
    }

    pub fn push(&self, origin: PeerId, item: Value) {
        self.items().push(item);
        self.notify(origin);
    }

    pub fn remove_at(&self, origin: PeerId, index: usize) -> Result<Value, CollabError> {
        let removed = {
            let mut items = self.items();
            if index >= items.len() {
                return Err(CollabError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                });
            }
            items.remove(index)
        };
        self.notify(origin);
        Ok(removed)
    }

    pub fn update_at(&self, origin: PeerId, index: usize, item: Value) -> Result<(), CollabError> {
        {
            let mut items = self.items();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(CollabError::IndexOutOfBounds { index, len })?;
            *slot = item;
        }
        self.notify(origin);
        Ok(())
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<Change> {
        self.changes.subscribe()
    }

    pub fn subscribe_members(&self) -> watch::Receiver<BTreeSet<PeerId>> {
        self.members.subscribe()
    }

    fn join(&self, peer: PeerId) {
        self.members.send_modify(|members| {
            members.insert(peer);
        });
    }

    /// Returns whether any member is left.
    fn leave(&self, peer: PeerId) -> bool {
        self.members.send_if_modified(|members| members.remove(&peer));
        !self.members.borrow().is_empty()
    }

    fn notify(&self, origin: PeerId) {
        // No receivers just means nobody is listening yet.
        let _ = self.changes.send(Change { origin });
    }
}

/// In-process stand-in for the peer-to-peer transport.
///
/// Every [`PeerApp`](super::PeerApp) sharing a `Network` sees the same
/// sessions. A session lives while it has members. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct Network {
    sessions: Arc<Mutex<HashMap<SessionKey, Arc<Session>>>>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionKey, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `peer` to the session for `key`, creating it if needed.
    pub(super) fn join(&self, key: &SessionKey, peer: PeerId) -> Arc<Session> {
        let mut sessions = self.sessions();
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Session::new()))
            .clone();
        session.join(peer);
        session
    }

    /// Removes `peer`, dropping the session from the network once it is empty.
    pub(super) fn leave(&self, key: &SessionKey, session: &Arc<Session>, peer: PeerId) {
        let mut sessions = self.sessions();
        if session.leave(peer) {
            return;
        }
        if sessions
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, session))
        {
            sessions.remove(key);
            tracing::debug!(
                app = %key.app,
                collaboration = %key.collaboration,
                "closed empty session"
            );
        }
    }

    /// Number of sessions that still have members.
    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }
}
