//! # Validation Module
//!
//! Checkout precondition checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Validation                                │
//! │                                                                         │
//! │  "Payer" tapped on the order summary screen                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_cart(cart) ──────── empty? ──► EmptyCart                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_guest_info(info)                                             │
//! │  ├── name blank after trim?  ──► MissingGuestInfo { field: "name" }    │
//! │  ├── phone blank after trim? ──► MissingGuestInfo { field: "phone" }   │
//! │  └── phone format bad?       ──► InvalidPhone                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OK → submission proceeds (first persistence call happens after this)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures mean the guest fixes the form; no persistence call is
//! ever made for an attempt that fails here.

use crate::cart::Cart;
use crate::error::{ValidationError, ValidationResult};
use crate::types::GuestInfo;
use crate::PHONE_MIN_CHARS;

// =============================================================================
// Cart
// =============================================================================

/// Rejects checkout on an empty cart.
pub fn validate_cart(cart: &Cart) -> ValidationResult<()> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

// =============================================================================
// Guest Info
// =============================================================================

/// Validates the guest contact form: both fields present, phone well-formed.
pub fn validate_guest_info(info: &GuestInfo) -> ValidationResult<()> {
    if info.name.trim().is_empty() {
        return Err(ValidationError::MissingGuestInfo { field: "name" });
    }

    if info.phone.trim().is_empty() {
        return Err(ValidationError::MissingGuestInfo { field: "phone" });
    }

    validate_phone(&info.phone)
}

/// Phone format check: at least [`PHONE_MIN_CHARS`] characters, every one of
/// them a digit, `+`, `-`, space, or parenthesis.
///
/// Deliberately loose - it accepts "+33 6 12 34 56 78" as well as
/// "(555) 010-9999". The counter calls the guest back; this only catches
/// obvious typos.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');

    if phone.chars().count() < PHONE_MIN_CHARS || !phone.chars().all(allowed) {
        return Err(ValidationError::InvalidPhone {
            min: PHONE_MIN_CHARS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
