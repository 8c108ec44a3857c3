//! # Repository Module
//!
//! Database repository implementations for Bistro.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout / Tracker                                                    │
//! │       │                                                                 │
//! │       │  db.orders().create_order(&new_order)                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create_order(&self, order)                                        │
//! │  ├── create_order_line(&self, line)                                    │
//! │  ├── get_order_with_lines(&self, id)                                   │
//! │  └── max_issued_ticket_number(&self)                                   │
//! │       │                                                                 │
//! │       │  SQL Query + row decoding                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Category and product reads
//! - [`OrderRepository`] - Order and order line operations
//!
//! ## Row Structs
//! Each repository defines private `*Row` structs deriving `sqlx::FromRow`.
//! Columns that need domain decoding (status strings, JSON blobs) land in
//! the row as raw SQL types and are converted explicitly, so a bad row turns
//! into a [`StoreError::Decode`](crate::error::StoreError) instead of a panic.

pub mod catalog;
pub mod order;

pub use catalog::CatalogRepository;
pub use order::OrderRepository;
