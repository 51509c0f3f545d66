use std::{
    collections::BTreeSet,
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{broadcast, watch};

use crate::collab::{
    CollabError, CrdtKind, PeerId,
    network::{Change, Network, Session, SessionKey},
};

/// Notification that the shared value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    /// The change was made through this replica.
    pub from_self: bool,
}

/// This peer's membership in one collaboration.
///
/// Dropping it (or calling [`Collaboration::leave`]) removes the peer from the
/// membership set seen by the other peers.
#[derive(Debug)]
pub struct Collaboration {
    name: String,
    kind: CrdtKind,
    peer: PeerId,
    network: Network,
    key: SessionKey,
    session: Arc<Session>,
    left: AtomicBool,
}

impl Collaboration {
    pub(super) fn join(kind: CrdtKind, peer: PeerId, network: Network, key: SessionKey) -> Self {
        let session = network.join(&key, peer);
        Self {
            name: key.collaboration.clone(),
            kind,
            peer,
            network,
            key,
            session,
            left: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CrdtKind {
        self.kind
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer
    }

    /// Typed view over the replicated array.
    pub fn shared<T>(&self) -> SharedArray<'_, T>
    where
        T: Serialize + DeserializeOwned,
    {
        SharedArray {
            collaboration: self,
            _item: PhantomData,
        }
    }

    pub fn state_changes(&self) -> StateChanges {
        StateChanges {
            peer: self.peer,
            inner: self.session.subscribe_changes(),
        }
    }

    pub fn membership(&self) -> watch::Receiver<BTreeSet<PeerId>> {
        self.session.subscribe_members()
    }

    pub fn leave(&self) {
        if !self.left.swap(true, Ordering::SeqCst) {
            self.network.leave(&self.key, &self.session, self.peer);
            tracing::debug!(collaboration = %self.name, peer = %self.peer, "left collaboration");
        }
    }
}

impl Drop for Collaboration {
    fn drop(&mut self) {
        self.leave();
    }
}

/// Stream of [`StateChanged`] events for one replica.
#[derive(Debug)]
pub struct StateChanges {
    peer: PeerId,
    inner: broadcast::Receiver<Change>,
}

impl StateChanges {
    /// Waits for the next change. Returns `None` once the session is gone.
    ///
    /// Missed events are reported as a single remote change.
    pub async fn recv(&mut self) -> Option<StateChanged> {
        match self.inner.recv().await {
            Ok(change) => Some(StateChanged {
                from_self: change.origin == self.peer,
            }),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "state change listener lagged behind");
                Some(StateChanged { from_self: false })
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Typed access to a collaboration's replicated array.
///
/// Items travel as JSON values; entries that do not decode as `T` are skipped.
pub struct SharedArray<'a, T> {
    collaboration: &'a Collaboration,
    _item: PhantomData<fn() -> T>,
}

impl<T> SharedArray<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn value(&self) -> Vec<T> {
        self.session()
            .value()
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value(raw) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(index, %err, "skipping undecodable shared item");
                    None
                }
            })
            .collect()
    }

    /// Position and decoded value of the first entry matching `predicate`.
    ///
    /// The position counts undecodable entries too, so it is valid for
    /// [`remove_at`](Self::remove_at) and [`update_at`](Self::update_at).
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<(usize, T)> {
        self.session()
            .value()
            .into_iter()
            .enumerate()
            .find_map(|(index, raw)| {
                let item: T = serde_json::from_value(raw).ok()?;
                predicate(&item).then_some((index, item))
            })
    }

    pub fn len(&self) -> usize {
        self.session().value().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, item: &T) -> Result<(), CollabError> {
        let raw = serde_json::to_value(item)?;
        self.session().push(self.collaboration.peer, raw);
        Ok(())
    }

    pub fn remove_at(&self, index: usize) -> Result<(), CollabError> {
        self.session().remove_at(self.collaboration.peer, index)?;
        Ok(())
    }

    pub fn update_at(&self, index: usize, item: &T) -> Result<(), CollabError> {
        let raw = serde_json::to_value(item)?;
        self.session().update_at(self.collaboration.peer, index, raw)
    }

    fn session(&self) -> &Session {
        &self.collaboration.session
    }
}
