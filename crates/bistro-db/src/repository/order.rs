//! # Order Repository
//!
//! Database operations for orders and order lines.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Persistence                                   │
//! │                                                                         │
//! │  1. TICKET NUMBER                                                      │
//! │     └── max_issued_ticket_number() → checkout adds 1                   │
//! │                                                                         │
//! │  2. HEADER                                                             │
//! │     └── create_order() → Order { status: Paid }                        │
//! │                                                                         │
//! │  3. LINES (sequential)                                                 │
//! │     └── create_order_line() → OrderLine                                │
//! │     └── create_order_line() → OrderLine                                │
//! │                                                                         │
//! │  4. (ON LINE FAILURE) ROLLBACK                                         │
//! │     └── delete_order() → cascades to the lines already written         │
//! │                                                                         │
//! │  5. (LATER) FULFILLMENT                                                │
//! │     └── update_order_status() → paid → preparing → ready → completed   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decoding Policy
//! `status` is decoded leniently (`OrderStatus::parse`) because fulfillment
//! may introduce statuses ahead of client releases. `payment_method` and
//! `selected_options` are only ever written by this client, so they decode
//! strictly and a bad value surfaces as [`StoreError::Decode`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use bistro_core::{
    Customization, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus, OrderWithLines,
    PaymentMethod,
};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

// =============================================================================
// Row Structs
// =============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    ticket_number: i64,
    customer_id: Option<String>,
    guest_name: String,
    guest_phone: String,
    status: String,
    total_price_cents: i64,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> StoreResult<Order> {
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            StoreError::decode(
                "payment_method",
                format!("unrecognized value '{}'", row.payment_method),
            )
        })?;

        Ok(Order {
            id: row.id,
            ticket_number: row.ticket_number,
            customer_id: row.customer_id,
            guest_name: row.guest_name,
            guest_phone: row.guest_phone,
            status: OrderStatus::parse(&row.status),
            total_price_cents: row.total_price_cents,
            payment_method,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    id: String,
    order_id: String,
    product_id: String,
    name_snapshot: String,
    quantity: i64,
    unit_price_cents: i64,
    selected_options: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = StoreError;

    fn try_from(row: OrderLineRow) -> StoreResult<OrderLine> {
        let selected_options = match row.selected_options.as_deref() {
            None | Some("") => Customization::new(),
            Some(json) => serde_json::from_str(json)
                .map_err(|e| StoreError::decode("selected_options", e.to_string()))?,
        };

        Ok(OrderLine {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            name_snapshot: row.name_snapshot,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            selected_options,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order header and returns the created row.
    ///
    /// The store assigns `id` (UUID v4) and `created_at`; everything else
    /// comes from the caller.
    pub async fn create_order(&self, new_order: &NewOrder) -> StoreResult<Order> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, ticket_number = new_order.ticket_number, "Creating order");

        let order = Order {
            id: id.clone(),
            ticket_number: new_order.ticket_number,
            customer_id: new_order.customer_id.clone(),
            guest_name: new_order.guest_name.clone(),
            guest_phone: new_order.guest_phone.clone(),
            status: new_order.status,
            total_price_cents: new_order.total_price_cents,
            payment_method: new_order.payment_method,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, ticket_number, customer_id, guest_name, guest_phone,
                status, total_price_cents, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&order.id)
        .bind(order.ticket_number)
        .bind(&order.customer_id)
        .bind(&order.guest_name)
        .bind(&order.guest_phone)
        .bind(order.status.as_str())
        .bind(order.total_price_cents)
        .bind(order.payment_method.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    /// Inserts an order line and returns the created row.
    ///
    /// ## Snapshot Pattern
    /// `name_snapshot` and `unit_price_cents` are frozen copies of product
    /// data at order time, so later menu edits never rewrite order history.
    ///
    /// An empty customization is stored as NULL rather than `{}`.
    pub async fn create_order_line(&self, new_line: &NewOrderLine) -> StoreResult<OrderLine> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            order_id = %new_line.order_id,
            product_id = %new_line.product_id,
            "Creating order line"
        );

        let selected_options_json = if new_line.selected_options.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&new_line.selected_options).map_err(|e| {
                    StoreError::Internal(format!("serializing selected_options: {e}"))
                })?,
            )
        };

        sqlx::query(
            r#"
            INSERT INTO order_lines (
                id, order_id, product_id, name_snapshot,
                quantity, unit_price_cents, selected_options, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(&new_line.order_id)
        .bind(&new_line.product_id)
        .bind(&new_line.name_snapshot)
        .bind(new_line.quantity)
        .bind(new_line.unit_price_cents)
        .bind(&selected_options_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(OrderLine {
            id,
            order_id: new_line.order_id.clone(),
            product_id: new_line.product_id.clone(),
            name_snapshot: new_line.name_snapshot.clone(),
            quantity: new_line.quantity,
            unit_price_cents: new_line.unit_price_cents,
            selected_options: new_line.selected_options.clone(),
            created_at: now,
        })
    }

    /// Gets an order header by ID.
    pub async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, ticket_number, customer_id, guest_name, guest_phone,
                   status, total_price_cents, payment_method, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Gets an order with its lines in insertion order.
    ///
    /// ## Errors
    /// Returns [`StoreError::NotFound`] when the order does not exist; the
    /// confirmation and tracking screens always hold an ID they just created.
    pub async fn get_order_with_lines(&self, id: &str) -> StoreResult<OrderWithLines> {
        let order = self
            .get_order(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Order", id))?;

        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT id, order_id, product_id, name_snapshot,
                   quantity, unit_price_cents, selected_options, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let lines = rows
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(OrderWithLines { order, lines })
    }

    /// Returns the highest ticket number issued so far, or `None` when no
    /// orders exist yet.
    ///
    /// The checkout layer adds 1 to this to get the next ticket.
    pub async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(ticket_number) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(max)
    }

    /// Deletes an order; the schema cascades to its lines.
    ///
    /// ## Saga Cleanup
    /// This is the rollback half of submission: if a line insert fails after
    /// the header was written, the checkout layer deletes the header so no
    /// partial order survives. Deleting an order that is already gone is a
    /// no-op, so cleanup can run after an earlier partial cleanup.
    pub async fn delete_order(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(
            id = %id,
            rows = result.rows_affected(),
            "Deleted order"
        );

        Ok(())
    }

    /// Updates an order's fulfillment status.
    ///
    /// The guest client never calls this; it exists for the kitchen-side
    /// process and the fulfillment simulator.
    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> StoreResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Order", id));
        }

        Ok(())
    }
}
