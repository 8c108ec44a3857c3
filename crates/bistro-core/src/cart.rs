//! # Cart Module
//!
//! The in-memory cart: an ordered list of line items plus a derived item
//! count, mutated exclusively through a reducer over [`CartAction`].
//!
//! ## Reducer Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart State Machine                               │
//! │                                                                         │
//! │                    ┌──────────────────────┐                             │
//! │   AddItem(draft)──►│                      │  fresh UUID line id,        │
//! │                    │        Cart          │  quantity = 1, append       │
//! │   RemoveItem{id}──►│                      │  drop line, count -= qty    │
//! │                    │  items: Vec<Line>    │  (floored at 0)             │
//! │   UpdateQty{..} ──►│  item_count: i64     │  clamp ≥ 1, count = Σqty    │
//! │                    │                      │                             │
//! │   Clear ──────────►│                      │  back to empty              │
//! │                    └──────────────────────┘                             │
//! │                                                                         │
//! │   INVARIANT: item_count == Σ items[i].quantity   (always)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deliberate Behaviors
//! - Adding the same product with the same customization twice yields two
//!   distinct lines. Each line keeps its own quantity, so a guest can edit
//!   "2× Burger plain" and "1× Burger no onions" independently.
//! - Removing an id that is not in the cart is a silent no-op.
//! - `UpdateQuantity` recomputes the count as a full sum rather than applying
//!   a delta, so the invariant holds even against a hypothetically bad prior
//!   state.
//!
//! All transitions are synchronous and deterministic; the session layer wraps
//! a `Cart` in a mutex handle when async tasks need snapshots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::options::Customization;
use crate::types::Product;

// =============================================================================
// Line Item Draft
// =============================================================================

/// The add-to-cart payload produced by the customization screen: everything a
/// line needs except its id and quantity, which the cart assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemDraft {
    pub product_id: String,
    pub product_name: String,

    /// Menu price before customization.
    pub base_price: Money,

    /// Base price plus selected option surcharges. Always populated: equals
    /// `base_price` for an uncustomized product.
    pub final_price: Money,

    /// Option selections, keyed by group title. Empty when ordered as-is.
    pub customization: Customization,

    pub image_url: Option<String>,
}

impl LineItemDraft {
    /// Draft for a product ordered as-is, skipping the customization screen.
    pub fn for_product(product: &Product) -> Self {
        LineItemDraft {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            base_price: product.price(),
            final_price: product.price(),
            customization: Customization::new(),
            image_url: product.image_url.clone(),
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One purchasable unit in the cart, distinct from every other line even when
/// it refers to the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineItem {
    /// Opaque unique id assigned at add time; the handle for remove/update.
    pub id: String,

    pub product_id: String,
    pub product_name: String,
    pub base_price: Money,
    pub final_price: Money,
    pub customization: Customization,
    pub image_url: Option<String>,

    /// Always >= 1.
    pub quantity: i64,
}

impl CartLineItem {
    /// Returns `final_price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.final_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Action
// =============================================================================

/// The tagged transitions the cart reducer accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Append a new line with quantity 1 and a fresh id.
    AddItem(LineItemDraft),
    /// Remove a line by id; no-op if absent.
    RemoveItem { id: String },
    /// Clamp to >= 1 and replace a line's quantity; no-op if absent.
    UpdateQuantity { id: String, quantity: i64 },
    /// Reset to the empty cart.
    Clear,
}

// =============================================================================
// Cart
// =============================================================================

/// The session cart. Fields are private: every mutation flows through
/// [`Cart::apply`], which is what keeps the item-count invariant honest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    /// Lines in insertion order (display order).
    items: Vec<CartLineItem>,

    /// Sum of all line quantities, maintained by the reducer.
    item_count: i64,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Applies one action. This is the single mutation path.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(draft) => {
                self.items.push(CartLineItem {
                    id: Uuid::new_v4().to_string(),
                    product_id: draft.product_id,
                    product_name: draft.product_name,
                    base_price: draft.base_price,
                    final_price: draft.final_price,
                    customization: draft.customization,
                    image_url: draft.image_url,
                    quantity: 1,
                });
                self.item_count += 1;
            }

            CartAction::RemoveItem { id } => {
                if let Some(pos) = self.items.iter().position(|item| item.id == id) {
                    let removed = self.items.remove(pos);
                    self.item_count = (self.item_count - removed.quantity).max(0);
                }
            }

            CartAction::UpdateQuantity { id, quantity } => {
                let quantity = quantity.max(1);
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.quantity = quantity;
                }
                // Full recompute, not a delta
                self.item_count = self.items.iter().map(|item| item.quantity).sum();
            }

            CartAction::Clear => {
                self.items.clear();
                self.item_count = 0;
            }
        }
    }

    /// Adds a draft and returns the new line's id.
    pub fn add_item(&mut self, draft: LineItemDraft) -> String {
        self.apply(CartAction::AddItem(draft));
        self.items
            .last()
            .map(|item| item.id.clone())
            .unwrap_or_default()
    }

    /// Removes a line by id; silent no-op if absent.
    pub fn remove_item(&mut self, id: &str) {
        self.apply(CartAction::RemoveItem { id: id.to_string() });
    }

    /// Sets a line's quantity (clamped to >= 1); silent no-op if absent.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        self.apply(CartAction::UpdateQuantity {
            id: id.to_string(),
            quantity,
        });
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.apply(CartAction::Clear);
    }

    /// Lines in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of all line quantities (the badge number on the cart icon).
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    /// True when the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pre-tax subtotal: `Σ final_price × quantity` over all lines.
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.line_total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

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

    fn assert_count_invariant(cart: &Cart) {
        let sum: i64 = cart.items().iter().map(|item| item.quantity).sum();
        assert_eq!(cart.item_count(), sum);
    }

    #[test]
    fn test_add_assigns_id_and_quantity_one() {
        let mut cart = Cart::new();
        let id = cart.add_item(draft("Burger", 1000));

        assert_eq!(cart.items().len(), 1);
        assert!(!id.is_empty());
        assert_eq!(cart.items()[0].id, id);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_never_dedups() {
        // Same product, same customization: still two independent lines
        let mut cart = Cart::new();
        let first = cart.add_item(draft("Burger", 1000));
        let second = cart.add_item(draft("Burger", 1000));

        assert_eq!(cart.items().len(), 2);
        assert_ne!(first, second);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_remove_decrements_by_line_quantity() {
        let mut cart = Cart::new();
        let id = cart.add_item(draft("Burger", 1000));
        cart.update_quantity(&id, 3);
        cart.add_item(draft("Frites", 350));
        assert_eq!(cart.item_count(), 4);

        cart.remove_item(&id);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_count_invariant(&cart);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(draft("Burger", 1000));
        let before = cart.clone();

        cart.remove_item("no-such-line");

        assert_eq!(cart.items().len(), before.items().len());
        assert_eq!(cart.item_count(), before.item_count());
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        let id = cart.add_item(draft("Burger", 1000));

        cart.update_quantity(&id, 0);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity(&id, -5);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity(&id, 4);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_missing_id_keeps_items() {
        let mut cart = Cart::new();
        let id = cart.add_item(draft("Burger", 1000));
        cart.update_quantity(&id, 2);

        cart.update_quantity("no-such-line", 9);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_clear_resets() {
        let mut cart = Cart::new();
        cart.add_item(draft("Burger", 1000));
        cart.add_item(draft("Frites", 350));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price().cents(), 0);
    }

    #[test]
    fn test_total_price_uses_final_price() {
        let mut cart = Cart::new();
        let mut customized = draft("Burger", 1000);
        customized.final_price = Money::from_cents(1150); // + Bacon
        let id = cart.add_item(customized);
        cart.update_quantity(&id, 2);
        cart.add_item(draft("Frites", 350));

        // 2 × 11.50 + 1 × 3.50 = 26.50
        assert_eq!(cart.total_price().cents(), 2650);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new();
        cart.add_item(draft("Burger", 1000));
        cart.add_item(draft("Frites", 350));
        cart.add_item(draft("Coca", 250));

        let names: Vec<&str> = cart
            .items()
            .iter()
            .map(|item| item.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["Burger", "Frites", "Coca"]);
    }

    #[test]
    fn test_count_invariant_over_random_walk() {
        // Scripted op sequence covering every action; the invariant must hold
        // after every single step
        let mut cart = Cart::new();
        let mut ids: Vec<String> = Vec::new();

        for step in 0..200 {
            match step % 7 {
                0 | 1 | 2 => {
                    let id = cart.add_item(draft("Burger", 1000));
                    ids.push(id);
                }
                3 => {
                    if let Some(id) = ids.get(step % ids.len().max(1)) {
                        cart.update_quantity(id, (step as i64 % 9) - 2);
                    }
                }
                4 => {
                    if !ids.is_empty() {
                        let id = ids.remove(step % ids.len());
                        cart.remove_item(&id);
                    }
                }
                5 => {
                    cart.remove_item("never-existed");
                    cart.update_quantity("never-existed", 5);
                }
                _ => {
                    if step % 70 == 6 {
                        cart.clear();
                        ids.clear();
                    }
                }
            }
            assert_count_invariant(&cart);
        }
    }

    #[test]
    fn test_reducer_equals_convenience_methods() {
        let mut via_reducer = Cart::new();
        via_reducer.apply(CartAction::AddItem(draft("Burger", 1000)));
        let id = via_reducer.items()[0].id.clone();
        via_reducer.apply(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity: 3,
        });
        via_reducer.apply(CartAction::RemoveItem { id });
        via_reducer.apply(CartAction::Clear);

        assert!(via_reducer.is_empty());
        assert_eq!(via_reducer.item_count(), 0);
    }
}
