//! # Session Cart State
//!
//! Shared ownership of the session cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. The checkout service, the UI bridge, and background tasks all hold
//!    handles to the same cart
//! 2. Only one of them may mutate it at a time
//!
//! A `std::sync::Mutex` (not the tokio one) is deliberate: every cart
//! operation is synchronous and quick, and the lock is never held across an
//! await point. Async code that needs cart data takes a [`CartHandle::snapshot`]
//! and works on the detached copy.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Cart Operations                              │
//! │                                                                         │
//! │  Frontend Action           Handle Call             Cart Change          │
//! │  ───────────────           ───────────             ───────────          │
//! │                                                                         │
//! │  "Ajouter au panier" ─────► add_item(draft) ──────► new line, qty 1     │
//! │                                                                         │
//! │  Stepper +/− ─────────────► update_quantity() ────► qty clamped ≥ 1     │
//! │                                                                         │
//! │  Swipe to delete ─────────► remove_item(id) ──────► line dropped        │
//! │                                                                         │
//! │  Checkout succeeded ──────► clear() ──────────────► empty cart          │
//! │                                                                         │
//! │  Order summary ───────────► snapshot() ───────────► (read-only copy)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use bistro_core::{Cart, CartAction, LineItemDraft, Money};

/// Cloneable handle to the session cart. Every clone points at the same
/// underlying cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    cart: Arc<Mutex<Cart>>,
}

impl CartHandle {
    /// Creates a handle to a new empty cart.
    pub fn new() -> Self {
        CartHandle {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = cart_handle.with_cart(|cart| cart.item_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Applies one reducer action.
    pub fn apply(&self, action: CartAction) {
        self.with_cart_mut(|cart| cart.apply(action));
    }

    /// Adds a line and returns its id.
    pub fn add_item(&self, draft: LineItemDraft) -> String {
        self.with_cart_mut(|cart| cart.add_item(draft))
    }

    /// Removes a line by id; silent no-op if absent.
    pub fn remove_item(&self, id: &str) {
        self.with_cart_mut(|cart| cart.remove_item(id));
    }

    /// Sets a line's quantity (clamped to >= 1); silent no-op if absent.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        self.with_cart_mut(|cart| cart.update_quantity(id, quantity));
    }

    /// Empties the cart.
    pub fn clear(&self) {
        self.with_cart_mut(|cart| cart.clear());
    }

    /// Returns a detached copy of the cart, safe to hold across awaits.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(|cart| cart.clone())
    }

    /// The cart badge number: sum of all line quantities.
    pub fn item_count(&self) -> i64 {
        self.with_cart(|cart| cart.item_count())
    }

    /// True when the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.with_cart(|cart| cart.is_empty())
    }

    /// Pre-tax subtotal over all lines.
    pub fn total_price(&self) -> Money {
        self.with_cart(|cart| cart.total_price())
    }
}

impl Default for CartHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::Customization;

    fn draft(name: &str, cents: i64) -> LineItemDraft {
        LineItemDraft {
            product_id: format!("prod-{name}"),
            product_name: name.to_string(),
            base_price: Money::from_cents(cents),
            final_price: Money::from_cents(cents),
            customization: Customization::new(),
            image_url: None,
        }
    }

    #[test]
    fn test_clones_share_the_same_cart() {
        let handle = CartHandle::new();
        let clone = handle.clone();

        let id = handle.add_item(draft("Burger", 1000));
        clone.update_quantity(&id, 3);

        assert_eq!(handle.item_count(), 3);
        assert_eq!(clone.total_price().cents(), 3000);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let handle = CartHandle::new();
        handle.add_item(draft("Burger", 1000));

        let snapshot = handle.snapshot();
        handle.clear();

        assert!(handle.is_empty());
        assert_eq!(snapshot.items().len(), 1);
        assert_eq!(snapshot.item_count(), 1);
    }

    #[test]
    fn test_apply_routes_through_the_reducer() {
        let handle = CartHandle::new();
        handle.apply(CartAction::AddItem(draft("Frites", 350)));
        handle.apply(CartAction::Clear);

        assert!(handle.is_empty());
        assert_eq!(handle.item_count(), 0);
    }
}
