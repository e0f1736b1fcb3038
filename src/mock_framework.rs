//! # Mock Framework
//!
//! Utilities for testing clients and the actor in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers
//! like [`expect_action`] to assert what the client sent. [`FailingStore`]
//! stands in for a storage backend that breaks.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::actor_framework::{PersistedState, Response, StateClient, StateRequest};
use crate::storage::{KeyValueStore, StorageError};

/// Creates a mock client and a receiver for asserting requests.
///
/// No actor runs behind the client: the test plays the actor by reading from
/// the receiver and answering on the enclosed response channels.
pub fn create_mock_client<S: PersistedState>(
    buffer_size: usize,
) -> (StateClient<S>, mpsc::Receiver<StateRequest<S>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_publisher, snapshots) = watch::channel(S::Snapshot::default());
    (StateClient::new(sender, snapshots), receiver)
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<S: PersistedState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<(S::Action, Response<S::Snapshot>)> {
    match receiver.recv().await {
        Some(StateRequest::Action { action, respond_to }) => Some((action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot<S: PersistedState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<Response<S::Snapshot>> {
    match receiver.recv().await {
        Some(StateRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Storage backend whose reads and/or writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingStore {
    pub fn unreadable() -> Self {
        Self { fail_reads: true, fail_writes: false }
    }

    pub fn unwritable() -> Self {
        Self { fail_reads: false, fail_writes: true }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("read refused".to_string()));
        }
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("write refused".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::{CartAction, CartError, CartState};
    use crate::clients::CartClient;
    use crate::domain::{Cart, NewCartItem};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<CartState>(10);
        let client = CartClient::new(inner);

        let add_task = tokio::spawn(async move {
            client.add_to_cart(NewCartItem::new("p1", "Widget", "u", 9.99)).await
        });

        let (action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        let item = match action {
            CartAction::AddToCart(item) => item,
            other => panic!("Unexpected action: {:?}", other),
        };
        assert_eq!(item.id, "p1");

        let mut cart = Cart::new();
        cart.add(item);
        responder.send(Ok(cart.clone())).unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(result, Ok(cart));
    }

    #[tokio::test]
    async fn test_increment_and_decrement_send_ids() {
        let (inner, mut receiver) = create_mock_client::<CartState>(10);
        let client = CartClient::new(inner);

        let task = tokio::spawn(async move {
            client.increment("p1").await?;
            client.decrement("p2").await
        });

        let (action, responder) = expect_action(&mut receiver).await.expect("Expected increment");
        assert!(matches!(action, CartAction::Increment(ref id) if id == "p1"));
        responder.send(Ok(Cart::new())).unwrap();

        let (action, responder) = expect_action(&mut receiver).await.expect("Expected decrement");
        assert!(matches!(action, CartAction::Decrement(ref id) if id == "p2"));
        responder.send(Ok(Cart::new())).unwrap();

        assert_eq!(task.await.unwrap(), Ok(Cart::new()));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_communication_error() {
        let (inner, mut receiver) = create_mock_client::<CartState>(10);
        let client = CartClient::new(inner);

        let task = tokio::spawn(async move { client.items().await });

        let responder = expect_snapshot(&mut receiver).await.expect("Expected Snapshot request");
        drop(responder);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(CartError::ActorCommunication(_))));
    }
}
