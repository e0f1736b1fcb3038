use tracing::debug;

use super::actions::CartAction;
use crate::actor_framework::PersistedState;
use crate::domain::{Cart, CartItem, ZeroQuantityPolicy};

/// The cart as owned by the actor, together with its zero-quantity policy.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Cart,
    policy: ZeroQuantityPolicy,
}

impl CartState {
    pub fn new(policy: ZeroQuantityPolicy) -> Self {
        Self {
            cart: Cart::new(),
            policy,
        }
    }

    fn apply_policy(&mut self) {
        if self.policy == ZeroQuantityPolicy::Prune {
            let removed = self.cart.prune_empty();
            if removed > 0 {
                debug!(removed, "Pruned zero-quantity items");
            }
        }
    }
}

impl PersistedState for CartState {
    type Snapshot = Cart;
    type Action = CartAction;

    fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Adopts a stored cart. Under [`ZeroQuantityPolicy::Prune`] any
    /// zero-quantity leftovers are dropped on the way in.
    ///
    /// # Errors
    /// Rejects the whole cart, leaving the state untouched, when any item
    /// has an empty id or an invalid price.
    fn restore(&mut self, stored: Cart) -> Result<(), String> {
        stored.iter().try_for_each(CartItem::validate)?;
        self.cart = stored;
        self.apply_policy();
        Ok(())
    }

    /// Handles cart mutations.
    ///
    /// # Errors
    /// Only `AddToCart` can fail, when the payload does not validate.
    fn handle_action(&mut self, action: CartAction) -> Result<(), String> {
        match action {
            CartAction::AddToCart(item) => {
                item.validate()?;
                self.cart.add(item);
            }
            CartAction::Increment(id) => {
                if !self.cart.increment(&id) {
                    debug!(item_id = %id, "Increment for unknown item ignored");
                }
            }
            CartAction::Decrement(id) => {
                if !self.cart.decrement(&id) {
                    debug!(item_id = %id, "Decrement for unknown item ignored");
                }
            }
        }
        self.apply_policy();
        Ok(())
    }
}
