use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart_item::{CartItem, NewCartItem};

/// What happens to an item whose quantity has dropped to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroQuantityPolicy {
    /// The item stays in the cart with quantity 0.
    #[default]
    Keep,
    /// The item is removed as soon as its quantity reaches 0.
    Prune,
}

/// Raised when a stored cart lists the same product twice.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("duplicate cart item id: {0}")]
pub struct DuplicateItemError(pub String);

/// Ordered collection of cart items, unique by id.
///
/// Insertion order is kept across every mutation. On the wire the cart is a
/// plain JSON array of [`CartItem`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of quantities across all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all items.
    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    /// Adds one unit of `item`.
    ///
    /// A known id only has its quantity bumped; the stored title, image and
    /// price are left as they were. An unknown id is appended with quantity 1.
    pub fn add(&mut self, item: NewCartItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(item.into_cart_item()),
        }
    }

    /// Returns `false` when no item has this id.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no item has this id. Quantity never goes below 0.
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Drops every zero-quantity item and returns how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.quantity > 0);
        before - self.items.len()
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = DuplicateItemError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if items[..index].iter().any(|earlier| earlier.id == item.id) {
                return Err(DuplicateItemError(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> NewCartItem {
        NewCartItem::new("p1", "Widget", "u", 9.99)
    }

    fn gadget() -> NewCartItem {
        NewCartItem::new("p2", "Gadget", "g", 20.0)
    }

    #[test]
    fn test_add_appends_new_item_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(widget());

        assert_eq!(cart.len(), 1);
        let item = cart.get("p1").unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "Widget");
        assert_eq!(item.image_url, "u");
        assert_eq!(item.price, 9.99);
    }

    #[test]
    fn test_add_existing_only_bumps_quantity() {
        let mut cart = Cart::new();
        cart.add(widget());
        cart.add(gadget());
        let before_other = cart.get("p2").cloned();

        // Different display fields on the second add must not overwrite the first
        cart.add(NewCartItem::new("p1", "Renamed", "other", 1.0));

        let item = cart.get("p1").unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, "Widget");
        assert_eq!(item.image_url, "u");
        assert_eq!(item.price, 9.99);
        assert_eq!(cart.get("p2").cloned(), before_other);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_order_is_stable_across_mutations() {
        let mut cart = Cart::new();
        cart.add(widget());
        cart.add(gadget());
        cart.increment("p1");
        cart.decrement("p2");
        cart.add(widget());

        let ids: Vec<&str> = cart.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_increment_unknown_id_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(widget());
        let before = cart.clone();

        assert!(!cart.increment("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_stops_at_zero() {
        let mut cart = Cart::new();
        cart.add(widget());
        cart.add(widget());

        assert!(cart.decrement("p1"));
        assert_eq!(cart.get("p1").unwrap().quantity, 1);
        assert!(cart.decrement("p1"));
        assert_eq!(cart.get("p1").unwrap().quantity, 0);
        assert!(cart.decrement("p1"));
        assert_eq!(cart.get("p1").unwrap().quantity, 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_prune_empty_removes_only_zero_quantities() {
        let mut cart = Cart::new();
        cart.add(widget());
        cart.add(gadget());
        cart.decrement("p1");

        assert_eq!(cart.prune_empty(), 1);
        assert!(cart.get("p1").is_none());
        assert_eq!(cart.get("p2").unwrap().quantity, 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(widget());
        cart.add(widget());
        cart.add(gadget());

        assert_eq!(cart.total_quantity(), 3);
        assert!((cart.total_price() - 39.98).abs() < 1e-9);
    }

    #[test]
    fn test_json_is_an_ordered_array() {
        let mut cart = Cart::new();
        cart.add(gadget());
        cart.add(widget());
        cart.increment("p1");

        let json = serde_json::to_string(&cart).unwrap();
        let decoded: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, cart);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array[0]["id"], "p2");
        assert_eq!(array[1]["id"], "p1");
        assert_eq!(array[1]["quantity"], 2);
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let json = r#"[
            {"id":"p1","title":"Widget","image_url":"u","price":9.99,"quantity":1},
            {"id":"p1","title":"Widget","image_url":"u","price":9.99,"quantity":3}
        ]"#;
        let err = serde_json::from_str::<Cart>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate cart item id: p1"));
    }

    #[test]
    fn test_policy_names() {
        let policy: ZeroQuantityPolicy = serde_json::from_str("\"prune\"").unwrap();
        assert_eq!(policy, ZeroQuantityPolicy::Prune);
        assert_eq!(ZeroQuantityPolicy::default(), ZeroQuantityPolicy::Keep);
    }
}
