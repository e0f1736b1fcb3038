use crate::domain::NewCartItem;

/// Mutations the cart actor accepts.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds one unit, appending the product if it is not in the cart yet.
    AddToCart(NewCartItem),
    /// Adds one unit to an existing product. Unknown ids are ignored.
    Increment(String),
    /// Removes one unit from an existing product, never going below 0.
    /// Unknown ids are ignored.
    Decrement(String),
}
