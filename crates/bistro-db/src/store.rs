//! # Order Store Contract
//!
//! The async trait the checkout and tracking layers depend on, plus its
//! SQLite implementation.
//!
//! ## Why A Trait
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Store Boundary                                      │
//! │                                                                         │
//! │  bistro-app                              bistro-db                      │
//! │                                                                         │
//! │  CheckoutService ──┐                                                    │
//! │                    ├──► Arc<dyn OrderStore> ──► Database ──► SQLite     │
//! │  OrderTracker  ────┘              ▲                                     │
//! │                                   │                                     │
//! │                        tests substitute mock stores                     │
//! │                        (call counting, fault injection)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The trait carries exactly what those layers need. Catalog conveniences
//! that only the seed and simulate binaries use (`get_product`, `search`)
//! stay on [`CatalogRepository`](crate::repository::CatalogRepository).

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::pool::Database;
use bistro_core::{
    Category, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, OrderWithLines, Product,
};

/// Persistence operations used by checkout and tracking.
///
/// All methods return [`StoreResult`]; implementations decide how SQL or
/// transport failures map onto [`StoreError`](crate::error::StoreError).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Lists all categories in menu order.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    /// Lists available products in a category, sorted by name.
    async fn list_products_by_category(&self, category_id: &str) -> StoreResult<Vec<Product>>;

    /// Inserts an order header and returns the created row.
    async fn create_order(&self, new_order: &NewOrder) -> StoreResult<Order>;

    /// Inserts an order line and returns the created row.
    async fn create_order_line(&self, new_line: &NewOrderLine) -> StoreResult<OrderLine>;

    /// Gets an order with its lines in insertion order.
    async fn get_order_with_lines(&self, id: &str) -> StoreResult<OrderWithLines>;

    /// Returns the highest ticket number issued so far, or `None` when no
    /// orders exist yet.
    async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>>;

    /// Deletes an order and (by cascade) its lines. Submission rollback.
    async fn delete_order(&self, id: &str) -> StoreResult<()>;

    /// Updates an order's fulfillment status. Kitchen-side only.
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()>;
}

#[async_trait]
impl OrderStore for Database {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.catalog().list_categories().await
    }

    async fn list_products_by_category(&self, category_id: &str) -> StoreResult<Vec<Product>> {
        self.catalog().list_products_by_category(category_id).await
    }

    async fn create_order(&self, new_order: &NewOrder) -> StoreResult<Order> {
        self.orders().create_order(new_order).await
    }

    async fn create_order_line(&self, new_line: &NewOrderLine) -> StoreResult<OrderLine> {
        self.orders().create_order_line(new_line).await
    }

    async fn get_order_with_lines(&self, id: &str) -> StoreResult<OrderWithLines> {
        self.orders().get_order_with_lines(id).await
    }

    async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>> {
        self.orders().max_issued_ticket_number().await
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        self.orders().delete_order(id).await
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()> {
        self.orders().update_order_status(id, status).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
