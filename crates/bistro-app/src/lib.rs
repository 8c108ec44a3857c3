//! # Bistro App
//!
//! Session and protocol layer of the guest ordering stack. Everything here is
//! stateful or async; the math it orchestrates lives in `bistro-core` and the
//! SQL in `bistro-db`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Crate Topology                                 │
//! │                                                                         │
//! │   UI events                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │   ┌──────────────┐   add/submit   ┌──────────────────┐                  │
//! │   │  session     │ ◄───────────── │  checkout        │                  │
//! │   │  CartHandle  │                │  CheckoutService │──► watch phases  │
//! │   └──────┬───────┘                └────────┬─────────┘                  │
//! │          │ Cart reducer                    │ OrderStore trait           │
//! │          ▼                                 ▼                            │
//! │   ┌──────────────┐                ┌──────────────────┐                  │
//! │   │ bistro-core  │                │    bistro-db     │                  │
//! │   │ (pure logic) │                │ (SQLite, sqlx)   │                  │
//! │   └──────────────┘                └────────┬─────────┘                  │
//! │                                            │                            │
//! │   ┌──────────────┐    poll loop            │                            │
//! │   │  tracker     │ ◄───────────────────────┘                            │
//! │   │ OrderTracker │──► watch snapshots                                   │
//! │   └──────────────┘                                                      │
//! │                                                                         │
//! │   config: bistro.toml + BISTRO_* env overrides, wired in at startup     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod tracker;

// Re-export the surface wiring code needs, so callers depend on one crate.
pub use checkout::{CheckoutConfig, CheckoutPhase, CheckoutService};
pub use config::AppConfig;
pub use error::{CheckoutError, CheckoutResult, ConfigError, ConfigResult};
pub use session::CartHandle;
pub use tracker::{OrderSnapshot, OrderTracker, TrackerHandle};

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes tracing for binaries in this workspace.
///
/// `RUST_LOG` takes precedence when set; the default keeps our crates at
/// debug and sqlx at warn.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,bistro_core=debug,bistro_db=debug,bistro_app=debug,sqlx=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
