//! # bistro-core: Pure Business Logic for Bistro
//!
//! This crate is the **heart** of Bistro, a guest mobile-ordering system.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile Frontend (React Native)                 │   │
//! │  │    Menu ──► Customize ──► Cart ──► Summary ──► Tracking        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bistro-app (Session Layer)                      │   │
//! │  │    CartHandle, CheckoutService, OrderTracker                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  options  │  │   money   │  │ progress  │  │   │
//! │  │   │   Cart    │  │ Resolver  │  │   Money   │  │  steps    │  │   │
//! │  │   │  reducer  │  │  schema   │  │    VAT    │  │   ETA     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bistro-db (Persistence Layer)                  │   │
//! │  │           SQLite queries, migrations, OrderStore trait          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Order, GuestInfo...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart reducer and its line items
//! - [`options`] - Product option schema and customization resolver
//! - [`validation`] - Checkout precondition checks
//! - [`progress`] - Fulfillment progression and pickup ETA derivations
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::cart::{Cart, LineItemDraft};
//! use bistro_core::money::{Money, OrderTotals};
//! use bistro_core::options::Customization;
//! use bistro_core::types::TaxRate;
//!
//! let mut cart = Cart::new();
//! cart.add_item(LineItemDraft {
//!     product_id: "prod-1".into(),
//!     product_name: "Burger Classique".into(),
//!     base_price: Money::from_cents(1000),
//!     final_price: Money::from_cents(1000),
//!     customization: Customization::new(),
//!     image_url: None,
//! });
//!
//! // Subtotal 10.00 € → VAT 2.00 € → total 12.00 €
//! let totals = OrderTotals::from_subtotal(
//!     cart.total_price(),
//!     TaxRate::from_bps(bistro_core::DEFAULT_VAT_RATE_BPS),
//! );
//! assert_eq!(totals.total.cents(), 1200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod options;
pub mod progress;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bistro_core::Cart` instead of
// `use bistro_core::cart::Cart`

pub use cart::{Cart, CartAction, CartLineItem, LineItemDraft};
pub use error::{ValidationError, ValidationResult};
pub use money::{Money, OrderTotals};
pub use options::{
    Customization, GroupKind, OptionGroup, OptionResolver, OptionSchema, OptionValue,
    SelectedValues,
};
pub use progress::{Eta, OrderProgress};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// French restaurant VAT in basis points (20%).
///
/// ## Why a constant?
/// The app serves a single restaurant in a single jurisdiction; the rate is
/// applied uniformly to every order. Sessions may still override it through
/// configuration without touching this default.
pub const DEFAULT_VAT_RATE_BPS: u32 = 2000;

/// Minimum number of characters a guest phone number must carry.
///
/// ## Business Reason
/// Short of a full telecom-grade parser, ten characters of digits and
/// separators filters out obvious typos while accepting international
/// formats.
pub const PHONE_MIN_CHARS: usize = 10;

/// Ticket numbers fall back to a random draw in `1..=TICKET_FALLBACK_MAX`
/// when the max-ticket query fails at submission time.
pub const TICKET_FALLBACK_MAX: i64 = 1000;
