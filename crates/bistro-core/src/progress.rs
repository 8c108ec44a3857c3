//! # Order Progress
//!
//! Pure display derivations for the tracking screen: where an order sits in
//! the fixed fulfillment progression, and when it should be ready.
//!
//! ```text
//!   paid ──► preparing ──► ready ──► completed
//!    │           │           │           │
//!    │           │           │           └── picked up, no ETA
//!    │           │           └── "MAINTENANT"
//!    │           └── created_at + 15 min
//!    └── created_at + 25 min
//! ```
//!
//! Everything here is a pure function of `(status, created_at)`; the polling
//! side lives in the session layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Order, OrderStatus};

/// Pickup estimate while the order is freshly paid.
pub const PAID_PICKUP_MINUTES: i64 = 25;

/// Pickup estimate once the kitchen has started.
pub const PREPARING_PICKUP_MINUTES: i64 = 15;

// =============================================================================
// Progression Steps
// =============================================================================

/// One step of the tracking screen's progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProgressStep {
    pub status: OrderStatus,
    /// French label shown under the step marker.
    pub label: &'static str,
}

/// The fixed fulfillment progression, in display order.
pub const STEPS: [ProgressStep; 4] = [
    ProgressStep {
        status: OrderStatus::Paid,
        label: "Confirmée",
    },
    ProgressStep {
        status: OrderStatus::Preparing,
        label: "En cuisine",
    },
    ProgressStep {
        status: OrderStatus::Ready,
        label: "Prête",
    },
    ProgressStep {
        status: OrderStatus::Completed,
        label: "Récupérée",
    },
];

/// Index of a status within [`STEPS`]; unrecognized statuses pin to 0 so the
/// progress bar never renders out of range.
pub fn step_index(status: OrderStatus) -> usize {
    STEPS
        .iter()
        .position(|step| step.status == status)
        .unwrap_or(0)
}

/// Progress percentage across the bar: 0, 33, 66, 100.
pub fn completion_percent(status: OrderStatus) -> u8 {
    (step_index(status) * 100 / (STEPS.len() - 1)) as u8
}

/// The one-line status sentence shown under the progress bar.
pub fn status_sentence(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Paid => "Votre commande est confirmée.",
        OrderStatus::Preparing => "Votre commande est en cours de préparation.",
        OrderStatus::Ready => "Votre commande est prête à être récupérée.",
        OrderStatus::Completed => "Votre commande a été récupérée.",
        OrderStatus::Unknown => "Statut inconnu.",
    }
}

// =============================================================================
// ETA
// =============================================================================

/// When the order should be ready for pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Eta {
    /// Ready right now - the counter has it.
    Now,
    /// Estimated ready time.
    At(#[ts(as = "String")] DateTime<Utc>),
}

impl Eta {
    /// Display form: "MAINTENANT" or "HH:MM". Callers render `None` ETAs as
    /// "--:--".
    pub fn display(&self) -> String {
        match self {
            Eta::Now => "MAINTENANT".to_string(),
            Eta::At(at) => at.format("%H:%M").to_string(),
        }
    }
}

/// Derives the pickup estimate: 25 minutes from creation while paid, 15 once
/// preparing, immediate when ready, nothing afterwards (or for statuses this
/// client does not recognize).
pub fn estimated_ready_at(status: OrderStatus, created_at: DateTime<Utc>) -> Option<Eta> {
    match status {
        OrderStatus::Paid => Some(Eta::At(created_at + Duration::minutes(PAID_PICKUP_MINUTES))),
        OrderStatus::Preparing => Some(Eta::At(
            created_at + Duration::minutes(PREPARING_PICKUP_MINUTES),
        )),
        OrderStatus::Ready => Some(Eta::Now),
        OrderStatus::Completed | OrderStatus::Unknown => None,
    }
}

// =============================================================================
// Aggregate Snapshot
// =============================================================================

/// Everything the tracking screen derives from one order poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderProgress {
    pub status: OrderStatus,
    pub step_index: usize,
    pub percent: u8,
    pub sentence: String,
    pub eta: Option<Eta>,
}

impl OrderProgress {
    /// Derives progress from a status and the order's creation time.
    pub fn for_status(status: OrderStatus, created_at: DateTime<Utc>) -> Self {
        OrderProgress {
            status,
            step_index: step_index(status),
            percent: completion_percent(status),
            sentence: status_sentence(status).to_string(),
            eta: estimated_ready_at(status, created_at),
        }
    }

    /// Derives progress from a persisted order.
    pub fn for_order(order: &Order) -> Self {
        Self::for_status(order.status, order.created_at)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
