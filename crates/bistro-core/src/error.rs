//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  └── ValidationError  - Checkout preconditions (cart, guest info)      │
//! │                                                                         │
//! │  bistro-db errors (separate crate)                                     │
//! │  └── StoreError       - Persistence operation failures                 │
//! │                                                                         │
//! │  bistro-app errors (session layer)                                     │
//! │  └── CheckoutError    - Validation | Persistence | PartialOrder        │
//! │                                                                         │
//! │  Flow: ValidationError ──┐                                             │
//! │        StoreError ───────┴──► CheckoutError ──► Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, group titles, etc.)
//! 3. Errors are enum variants, never String
//! 4. A validation failure means submission was never attempted

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Checkout precondition failures.
///
/// Raised before any persistence call is made; the guest fixes the input and
/// tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Checkout attempted with zero cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Guest name or phone is blank after trimming.
    #[error("{field} is required")]
    MissingGuestInfo { field: &'static str },

    /// Phone fails the format check: at least [`crate::PHONE_MIN_CHARS`]
    /// characters drawn from digits, `+`, `-`, space, and parentheses.
    #[error("phone number must be at least {min} characters (digits, +, -, spaces, parentheses)")]
    InvalidPhone { min: usize },

    /// Required option groups left unselected (only raised when the session
    /// enables enforcement).
    #[error("required options not selected: {}", groups.join(", "))]
    MissingRequiredOptions { groups: Vec<String> },
}

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::EmptyCart.to_string(), "cart is empty");

        let err = ValidationError::MissingGuestInfo { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidPhone { min: 10 };
        assert_eq!(
            err.to_string(),
            "phone number must be at least 10 characters (digits, +, -, spaces, parentheses)"
        );

        let err = ValidationError::MissingRequiredOptions {
            groups: vec!["Taille".to_string(), "Sauce".to_string()],
        };
        assert_eq!(err.to_string(), "required options not selected: Taille, Sauce");
    }
}
