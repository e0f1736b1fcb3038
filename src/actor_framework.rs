use std::fmt::Debug;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::storage::KeyValueStore;

// =============================================================================
// 1. THE ABSTRACTION (State trait with hooks and actions)
// =============================================================================

/// State owned by a [`StateActor`] and mirrored to a [`KeyValueStore`].
///
/// The actor is the only writer, so implementations never need locking.
pub trait PersistedState: Clone + Send + Sync + 'static {
    /// What gets stored and what readers receive.
    type Snapshot: Clone + Default + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Action: Send + Sync + Debug;

    fn snapshot(&self) -> Self::Snapshot;

    /// Hydration only happens while this returns `true`.
    fn is_empty(&self) -> bool;

    /// Adopts a snapshot read back from storage. An `Err` discards it and
    /// the state stays empty.
    fn restore(&mut self, stored: Self::Snapshot) -> Result<(), String>;

    /// Applies an action. An `Err` rejects it and leaves nothing persisted.
    fn handle_action(&mut self, action: Self::Action) -> Result<(), String>;
}

/// Lifecycle of a [`StateActor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No request has needed the state yet; storage has not been read.
    Uninitialized,
    /// The hydration attempt has run, whatever its outcome.
    Ready,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("action rejected: {0}")]
    Rejected(String),
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("actor closed")]
    ActorClosed,
    #[error("actor dropped the response")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum StateRequest<S: PersistedState> {
    Snapshot {
        respond_to: Response<S::Snapshot>,
    },
    Action {
        action: S::Action,
        respond_to: Response<S::Snapshot>,
    },
    Status {
        respond_to: Response<Lifecycle>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Single-writer owner of a [`PersistedState`].
///
/// Requests are handled strictly one at a time. A mutation is applied to a
/// copy, written to storage, and only then committed and published, so the
/// in-memory state never runs ahead of what is stored.
pub struct StateActor<S: PersistedState> {
    receiver: mpsc::Receiver<StateRequest<S>>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    state: S,
    lifecycle: Lifecycle,
    publisher: watch::Sender<S::Snapshot>,
}

impl<S: PersistedState> StateActor<S> {
    pub fn new(
        buffer_size: usize,
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        initial: S,
    ) -> (Self, StateClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, snapshots) = watch::channel(initial.snapshot());
        let actor = Self {
            receiver,
            storage,
            key: key.into(),
            state: initial,
            lifecycle: Lifecycle::Uninitialized,
            publisher,
        };
        let client = StateClient::new(sender, snapshots);
        (actor, client)
    }

    #[instrument(name = "state_actor", skip(self), fields(key = %self.key))]
    pub async fn run(mut self) {
        info!("State actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StateRequest::Snapshot { respond_to } => {
                    self.ensure_hydrated().await;
                    let _ = respond_to.send(Ok(self.state.snapshot()));
                }
                StateRequest::Action { action, respond_to } => {
                    self.ensure_hydrated().await;
                    let result = self.handle_action(action).await;
                    let _ = respond_to.send(result);
                }
                StateRequest::Status { respond_to } => {
                    let _ = respond_to.send(Ok(self.lifecycle));
                }
                StateRequest::Shutdown => {
                    info!("State actor shutting down");
                    break;
                }
            }
        }
        info!("State actor stopped");
    }

    async fn ensure_hydrated(&mut self) {
        if self.lifecycle == Lifecycle::Uninitialized {
            self.hydrate().await;
            self.lifecycle = Lifecycle::Ready;
        }
    }

    /// Read or decode failures are logged and treated as "nothing stored".
    #[instrument(skip(self))]
    async fn hydrate(&mut self) {
        if !self.state.is_empty() {
            debug!("State already populated, skipping hydration");
            return;
        }

        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!("Nothing stored");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored state, starting empty");
                return;
            }
        };

        match serde_json::from_str::<S::Snapshot>(&raw) {
            Ok(stored) => match self.state.restore(stored) {
                Ok(()) => {
                    self.publisher.send_replace(self.state.snapshot());
                    info!("Hydrated state from storage");
                }
                Err(e) => warn!(error = %e, "Stored state rejected, starting empty"),
            },
            Err(e) => warn!(error = %e, "Stored state is malformed, starting empty"),
        }
    }

    #[instrument(skip(self))]
    async fn handle_action(&mut self, action: S::Action) -> Result<S::Snapshot, FrameworkError> {
        debug!("Processing action");
        let mut next = self.state.clone();
        if let Err(e) = next.handle_action(action) {
            warn!(error = %e, "Action rejected");
            return Err(FrameworkError::Rejected(e));
        }

        let snapshot = next.snapshot();
        if let Err(e) = self.persist(&snapshot).await {
            error!(error = %e, "Persisting state failed, change discarded");
            return Err(e);
        }

        self.state = next;
        self.publisher.send_replace(snapshot.clone());
        debug!("Action committed");
        Ok(snapshot)
    }

    async fn persist(&self, snapshot: &S::Snapshot) -> Result<(), FrameworkError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| FrameworkError::Persistence(e.to_string()))?;
        self.storage
            .set(&self.key, raw)
            .await
            .map_err(|e| FrameworkError::Persistence(e.to_string()))
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct StateClient<S: PersistedState> {
    sender: mpsc::Sender<StateRequest<S>>,
    snapshots: watch::Receiver<S::Snapshot>,
}

impl<S: PersistedState> Clone for StateClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<S: PersistedState> StateClient<S> {
    pub(crate) fn new(
        sender: mpsc::Sender<StateRequest<S>>,
        snapshots: watch::Receiver<S::Snapshot>,
    ) -> Self {
        Self { sender, snapshots }
    }

    pub async fn snapshot(&self) -> Result<S::Snapshot, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StateRequest::Snapshot { respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(&self, action: S::Action) -> Result<S::Snapshot, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StateRequest::Action { action, respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn status(&self) -> Result<Lifecycle, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(StateRequest::Status { respond_to })
            .await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender.send(StateRequest::Shutdown)
            .await.map_err(|_| FrameworkError::ActorClosed)
    }

    /// Receiver that observes every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.snapshots.clone()
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
