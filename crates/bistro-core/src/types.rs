//! # Domain Types
//!
//! Core domain types used throughout Bistro.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  category_id    │   │  ticket_number  │       │
//! │  │  sort_order     │   │  price_cents    │   │  status         │       │
//! │  └─────────────────┘   │  options_config │   │  total_cents    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   OrderStatus   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Paid           │   │  CreditCard     │       │
//! │  │  2000 = 20%     │   │  Preparing      │   │  Mobile         │       │
//! │  └─────────────────┘   │  Ready          │   └─────────────────┘       │
//! │                        │  Completed      │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders have two identifiers:
//! - `id`: UUID v4 - immutable, used for database relations and tracking
//! - `ticket_number`: human-facing sequential number called out at the counter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::options::Customization;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20% (standard French restaurant VAT in this app)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A menu category (Burgers, Menus, Boissons, Desserts...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the menu.
    pub name: String,

    /// Optional illustration for the category tile.
    pub image_url: Option<String>,

    /// Position in the menu; categories are listed ascending by this key.
    pub sort_order: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A product on the menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Category this product belongs to.
    pub category_id: String,

    /// Display name shown to the guest and frozen onto order lines.
    pub name: String,

    /// Optional description for the product detail screen.
    pub description: Option<String>,

    /// Base price in cents, before customization extras.
    pub price_cents: i64,

    /// Optional product photo.
    pub image_url: Option<String>,

    /// Raw JSON option schema (radio/checkbox groups).
    /// Parsed leniently by [`crate::options::OptionSchema::parse`];
    /// absent means the product has no customization.
    pub options_config: Option<String>,

    /// Whether the product is currently orderable.
    pub is_available: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfillment status of an order.
///
/// The guest client only ever writes `Paid`; every later value is written by
/// the kitchen-side fulfillment process. `Unknown` absorbs values this build
/// does not recognize so the tracking screen stays safe to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment accepted, order queued for the kitchen.
    Paid,
    /// Kitchen has started the order.
    Preparing,
    /// Ready for pickup at the counter.
    Ready,
    /// Picked up by the guest.
    Completed,
    /// Stored value not recognized by this client version.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Canonical storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Paid => "paid",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Lenient parse: any unrecognized value becomes [`OrderStatus::Unknown`]
    /// instead of an error, since fulfillment may add statuses ahead of
    /// client releases.
    pub fn parse(s: &str) -> OrderStatus {
        match s {
            "paid" => OrderStatus::Paid,
            "preparing" => OrderStatus::Preparing,
            "ready" => OrderStatus::Ready,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Unknown,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the guest chose to pay. Payment capture itself is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment in the app.
    CreditCard,
    /// Mobile wallet payment.
    Mobile,
}

impl PaymentMethod {
    /// Canonical storage spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Mobile => "mobile",
        }
    }

    /// Strict parse; payment methods are only ever written by this client.
    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "mobile" => Some(PaymentMethod::Mobile),
            _ => None,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::CreditCard
    }
}

// =============================================================================
// Guest Info
// =============================================================================

/// Contact details collected on the order summary screen.
/// Validated by [`crate::validation::validate_guest_info`] before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuestInfo {
    pub name: String,
    pub phone: String,
}

impl GuestInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        GuestInfo {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted guest order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Human-facing sequential number called out at the counter.
    /// Distinct from `id`; assigned at submission time.
    pub ticket_number: i64,

    /// Always `None` for guest checkout; reserved for account orders.
    pub customer_id: Option<String>,

    pub guest_name: String,
    pub guest_phone: String,
    pub status: OrderStatus,

    /// Grand total in cents: subtotal + 20% VAT, computed once at submission.
    pub total_price_cents: i64,

    pub payment_method: PaymentMethod,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Fields needed to create an order; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub ticket_number: i64,
    pub customer_id: Option<String>,
    pub guest_name: String,
    pub guest_phone: String,
    pub status: OrderStatus,
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item on a persisted order.
/// Uses snapshot pattern to freeze product data at order time: a later menu
/// rename or price change must not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,

    /// Product name at order time (frozen).
    pub name_snapshot: String,

    /// Quantity ordered.
    pub quantity: i64,

    /// Unit price in cents at order time (the line's final price, customization
    /// extras included).
    pub unit_price_cents: i64,

    /// The guest's option selections, keyed by group title.
    pub selected_options: Customization,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (unit price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// Fields needed to create an order line; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrderLine {
    pub order_id: String,
    pub product_id: String,
    pub name_snapshot: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub selected_options: Customization,
}

// =============================================================================
// Order With Lines
// =============================================================================

/// An order joined with its lines, as returned by the confirmation and
/// tracking reads.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderWithLines {
    /// Recomputes the pre-tax subtotal from the stored lines.
    /// The confirmation screen shows this next to the persisted total.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
