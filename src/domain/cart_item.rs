use serde::{Deserialize, Serialize};

/// One distinct product held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    /// Same checks as [`NewCartItem::validate`], for items read back from
    /// storage.
    pub fn validate(&self) -> Result<(), String> {
        check_item(&self.id, self.price)
    }
}

fn check_item(id: &str, price: f64) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("item id must not be empty".to_string());
    }
    if !price.is_finite() || price < 0.0 {
        return Err(format!("invalid price for item {id}: {price}"));
    }
    Ok(())
}

/// Payload for putting a product into the cart.
///
/// Carries everything a [`CartItem`] has except the quantity, which the cart
/// owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Checks the payload before it reaches the cart.
    ///
    /// # Errors
    /// Returns a description of the problem when the id is empty or the price
    /// is negative or not a finite number.
    pub fn validate(&self) -> Result<(), String> {
        check_item(&self.id, self.price)
    }

    pub(crate) fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity: 1,
        }
    }
}
