//! # Cart Store
//!
//! An in-memory shopping cart mirrored to a key-value store.
//!
//! The cart is owned by a single actor task. Consumers hold a [`CartClient`]
//! and every read or mutation goes through it, so concurrent callers are
//! serialized and no update is lost. Each mutation is written to storage
//! before it is committed in memory, and the committed cart is returned to
//! the caller and published to subscribers.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use cart_store::{CartConfig, CartSystem, NewCartItem};
//!
//! let system = CartSystem::start(&CartConfig::default()).await?;
//! let cart = system.cart_client.add_to_cart(NewCartItem::new("p1", "Widget", "u", 9.99)).await?;
//! assert_eq!(cart.get("p1").map(|item| item.quantity), Some(1));
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod domain;
pub mod storage;

#[cfg(test)]
mod mock_framework;

pub use actor_framework::Lifecycle;
pub use app_system::{setup_tracing, use_cart, with_cart, CartConfig, CartSystem, ConfigError, StartupError};
pub use cart_actor::CartError;
pub use clients::CartClient;
pub use domain::{Cart, CartItem, NewCartItem, ZeroQuantityPolicy};
pub use storage::{InMemoryStore, JsonFileStore, KeyValueStore, StorageError};
