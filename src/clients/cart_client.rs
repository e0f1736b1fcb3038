use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::actor_framework::{Lifecycle, StateClient};
use crate::cart_actor::{CartAction, CartError, CartState};
use crate::domain::{Cart, NewCartItem};

/// Handle for reading and mutating the cart.
///
/// Cheap to clone; every clone talks to the same cart actor. Mutations
/// resolve once the updated cart has been written to storage and return the
/// committed cart.
#[derive(Clone)]
pub struct CartClient {
    inner: StateClient<CartState>,
}

impl CartClient {
    pub fn new(inner: StateClient<CartState>) -> Self {
        Self { inner }
    }

    /// Current cart contents.
    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.snapshot().await.map_err(CartError::from)
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.perform_action(CartAction::AddToCart(item)).await.map_err(CartError::from)
    }

    #[instrument(skip(self))]
    pub async fn increment(&self, id: &str) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.perform_action(CartAction::Increment(id.to_string())).await.map_err(CartError::from)
    }

    #[instrument(skip(self))]
    pub async fn decrement(&self, id: &str) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.perform_action(CartAction::Decrement(id.to_string())).await.map_err(CartError::from)
    }

    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<Lifecycle, CartError> {
        debug!("Sending request");
        self.inner.status().await.map_err(CartError::from)
    }

    /// Receiver that observes every committed cart, hydration included.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.subscribe()
    }

    pub(crate) async fn shutdown(&self) -> Result<(), CartError> {
        self.inner.shutdown().await.map_err(CartError::from)
    }
}
