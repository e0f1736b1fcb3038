//! Cart data model, free of actor and storage concerns.

pub mod cart;
pub mod cart_item;

pub use cart::*;
pub use cart_item::*;
