use tracing::{error, info, Instrument};

use cart_store::{setup_tracing, use_cart, Cart, CartConfig, CartError, CartSystem, NewCartItem};

/// A short shopping session run through the ambient cart scope.
async fn shopping_session() -> Result<Cart, CartError> {
    let cart = use_cart()?;

    cart.add_to_cart(NewCartItem::new("p1", "Widget", "https://example.com/widget.png", 9.99)).await?;
    cart.add_to_cart(NewCartItem::new("p2", "Gadget", "https://example.com/gadget.png", 24.50)).await?;
    cart.add_to_cart(NewCartItem::new("p1", "Widget", "https://example.com/widget.png", 9.99)).await?;
    cart.increment("p2").await?;
    cart.decrement("p1").await?;

    cart.items().await
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CartConfig::load().map_err(|e| e.to_string())?;
    info!(storage_key = %config.storage_key, storage_path = ?config.storage_path, "Starting cart system");

    let system = CartSystem::start(&config).await.map_err(|e| e.to_string())?;

    let span = tracing::info_span!("shopping_session");
    let result = system.scope(shopping_session()).instrument(span).await;

    match result {
        Ok(cart) => {
            for item in &cart {
                info!(item_id = %item.id, title = %item.title, quantity = item.quantity, "Cart line");
            }
            info!(
                lines = cart.len(),
                total_quantity = cart.total_quantity(),
                total_price = cart.total_price(),
                "Session finished"
            );
        }
        Err(e) => error!(error = %e, "Shopping session failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
