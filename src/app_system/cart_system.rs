use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use super::config::{CartConfig, ConfigError};
use super::scope::with_cart;
use crate::actor_framework::StateActor;
use crate::cart_actor::CartState;
use crate::clients::CartClient;
use crate::storage::{InMemoryStore, JsonFileStore, KeyValueStore, StorageError};

/// Errors raised while bringing a [`CartSystem`] up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The cart store as a running system.
///
/// Owns the cart actor task and hands out the [`CartClient`] that consumers
/// use to reach it.
pub struct CartSystem {
    pub cart_client: CartClient,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Starts the cart actor on the given storage backend.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `config` does not validate; no
    /// actor is spawned in that case.
    pub fn new(config: &CartConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = CartState::new(config.zero_quantity);
        let (actor, client) = StateActor::new(
            config.buffer_size,
            storage,
            config.storage_key.clone(),
            state,
        );
        let handle = tokio::spawn(actor.run());
        info!(storage_key = %config.storage_key, policy = ?config.zero_quantity, "Cart system started");

        Ok(Self {
            cart_client: CartClient::new(client),
            handle,
        })
    }

    /// Starts the system with the backend named by the config: a JSON file
    /// when `storage_path` is set, memory otherwise.
    pub async fn start(config: &CartConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let storage: Arc<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Arc::new(JsonFileStore::open(path).await?),
            None => Arc::new(InMemoryStore::new()),
        };
        Ok(Self::new(config, storage)?)
    }

    /// Runs `fut` with this system's cart reachable through
    /// [`use_cart`](super::use_cart).
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        with_cart(self.cart_client.clone(), fut).await
    }

    /// Stops the actor and waits for it to finish.
    ///
    /// Requests already queued are handled first. Client clones still held
    /// elsewhere fail with `ActorCommunication` afterwards.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cart system...");
        // Already gone is fine; the join below reports real failures.
        let _ = self.cart_client.shutdown().await;
        drop(self.cart_client);

        if let Err(e) = self.handle.await {
            error!("Cart actor task failed: {:?}", e);
            return Err(format!("Cart actor task failed: {:?}", e));
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}
