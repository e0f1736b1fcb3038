use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors surfaced to callers of the cart API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("use_cart must be called within a cart scope")]
    OutsideScope,
    #[error("Invalid cart item: {0}")]
    InvalidItem(String),
    #[error("Cart persistence failed: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<FrameworkError> for CartError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::Rejected(reason) => Self::InvalidItem(reason),
            FrameworkError::Persistence(reason) => Self::Persistence(reason),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                Self::ActorCommunication(e.to_string())
            }
        }
    }
}
