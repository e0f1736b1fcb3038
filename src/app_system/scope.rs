use std::future::Future;

use crate::cart_actor::CartError;
use crate::clients::CartClient;

tokio::task_local! {
    static CURRENT_CART: CartClient;
}

/// Runs `fut` with `client` reachable through [`use_cart`].
pub async fn with_cart<F: Future>(client: CartClient, fut: F) -> F::Output {
    CURRENT_CART.scope(client, fut).await
}

/// Returns the cart handle of the enclosing scope.
///
/// # Errors
/// [`CartError::OutsideScope`] when called outside [`with_cart`] or
/// [`CartSystem::scope`](super::CartSystem::scope).
pub fn use_cart() -> Result<CartClient, CartError> {
    CURRENT_CART
        .try_with(CartClient::clone)
        .map_err(|_| CartError::OutsideScope)
}
