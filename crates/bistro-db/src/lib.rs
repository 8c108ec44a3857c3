//! # bistro-db: Persistence Layer for Bistro
//!
//! This crate provides database access for the Bistro ordering app.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Data Flow                                 │
//! │                                                                         │
//! │  CheckoutService / OrderTracker (bistro-app)                           │
//! │       │                                                                 │
//! │       │  via the OrderStore trait                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bistro-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (catalog.rs,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  order.rs)    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CatalogRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ OrderRepo     │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`store`] - The `OrderStore` trait and its SQLite implementation
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (catalog, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_db::{Database, DbConfig, OrderStore};
//!
//! let db = Database::new(DbConfig::new("path/to/bistro.db")).await?;
//!
//! let categories = db.list_categories().await?;
//! let next_ticket = db.max_issued_ticket_number().await?.unwrap_or(0) + 1;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use store::OrderStore;

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
