//! Typed handles for talking to the actors.

pub mod cart_client;

pub use cart_client::*;
