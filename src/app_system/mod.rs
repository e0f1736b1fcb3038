//! System wiring, configuration, scoping, startup and shutdown.

pub mod cart_system;
pub mod config;
pub mod scope;
pub mod tracing;

pub use cart_system::*;
pub use config::*;
pub use scope::*;
pub use self::tracing::*;
