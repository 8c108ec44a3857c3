//! # Session Error Types
//!
//! Error types for the checkout protocol and app configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Error Flow                                │
//! │                                                                         │
//! │  bistro-core::ValidationError ──┐                                      │
//! │  (empty cart, guest info)       │                                      │
//! │                                 ├──► CheckoutError ──► Failed phase    │
//! │  bistro-db::StoreError ─────────┤    + returned to the caller          │
//! │  (queries, timeouts)            │                                      │
//! │                                 │                                      │
//! │  line insert failed ────────────┘                                      │
//! │  (PartialOrder, after rollback)                                        │
//! │                                                                         │
//! │  ConfigError is separate: it can only occur at startup, before any     │
//! │  session exists.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bistro_core::ValidationError;
use bistro_db::StoreError;

// =============================================================================
// Checkout Error
// =============================================================================

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Everything that can go wrong between "Payer" and a confirmed order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A precondition failed; no persistence call was made.
    /// The guest fixes the form or cart and taps "Payer" again.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store call failed or timed out after validation passed.
    #[error("order could not be saved: {0}")]
    Persistence(#[from] StoreError),

    /// A line insert failed mid-write. The parent order has been deleted
    /// (best effort); the cart is left intact so the guest can resubmit.
    #[error("order {order_id} was interrupted mid-write and rolled back")]
    PartialOrder { order_id: String },
}

impl CheckoutError {
    /// True when the guest can fix the problem by editing the form or cart.
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
    }

    /// True when resubmitting the same cart may succeed.
    /// The cart is never cleared on these paths.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Persistence(_) | CheckoutError::PartialOrder { .. }
        )
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// App configuration failures (load, save, validation).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Failed to serialize or write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// Configuration holds a value the app cannot run with.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}
