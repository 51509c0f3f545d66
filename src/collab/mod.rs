//! Collaboration sessions: a replicated shared array per named collaboration,
//! with state and membership notifications.
//!
//! Replicas run in one process and meet through a [`Network`]. Merge semantics
//! and transport are out of scope; a session applies operations in arrival
//! order under one lock.

mod network;
mod shared;

use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, PoisonError},
};

use uuid::Uuid;

pub use network::Network;
pub use shared::{Collaboration, SharedArray, StateChanged, StateChanges};

use network::SessionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(Uuid);

impl PeerId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Replicated data type backing a collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrdtKind {
    /// Replicated growable array.
    Rga,
}

impl FromStr for CrdtKind {
    type Err = CollabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rga" => Ok(CrdtKind::Rga),
            other => Err(CollabError::UnsupportedCrdt(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("peer app `{0}` has not been started")]
    NotStarted(String),
    #[error("unsupported crdt type `{0}`")]
    UnsupportedCrdt(String),
    #[error("index {index} out of bounds for shared array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("failed to encode shared value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A named application taking part in collaborations as one peer.
#[derive(Debug)]
pub struct PeerApp {
    name: String,
    network: Network,
    peer_id: Mutex<Option<PeerId>>,
}

impl PeerApp {
    pub fn new(name: impl Into<String>, network: Network) -> Self {
        Self {
            name: name.into(),
            network,
            peer_id: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigns this app its peer identity. Starting twice keeps the first one.
    pub async fn start(&self) -> Result<PeerId, CollabError> {
        let mut peer_id = self.peer_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *peer_id.get_or_insert_with(PeerId::generate);
        tracing::info!(app = %self.name, peer = %id, "peer app started");
        Ok(id)
    }

    pub fn peer_id(&self) -> Option<PeerId> {
        *self.peer_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Joins (creating if needed) the collaboration `name` and registers this
    /// peer as a member.
    pub async fn collaborate(
        &self,
        name: &str,
        kind: CrdtKind,
    ) -> Result<Collaboration, CollabError> {
        let peer = self
            .peer_id()
            .ok_or_else(|| CollabError::NotStarted(self.name.clone()))?;

        let key = SessionKey {
            app: self.name.clone(),
            collaboration: name.to_string(),
        };
        tracing::debug!(
            app = %self.name,
            collaboration = name,
            peer = %peer,
            "joining collaboration"
        );
        Ok(Collaboration::join(kind, peer, self.network.clone(), key))
    }
}
