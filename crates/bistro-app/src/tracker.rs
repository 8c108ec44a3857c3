//! # Order Tracker
//!
//! Background polling loop behind the confirmation screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Tracking Loop                               │
//! │                                                                     │
//! │   OrderTracker::spawn(store, order_id, every 10s)                   │
//! │        │                                                            │
//! │        ▼                                                            │
//! │   ┌─────────────────────────────┐      watch channel                │
//! │   │ tick ──► get_order_with_    │ ───────────────────► UI renders   │
//! │   │          lines(order_id)    │  Option<OrderSnapshot> the latest │
//! │   │          + derive progress  │                                   │
//! │   │                             │                                   │
//! │   │ poll error ──► keep last    │                                   │
//! │   │                snapshot     │                                   │
//! │   └─────────────────────────────┘                                   │
//! │        ▲                                                            │
//! │        │ stops on TrackerHandle::shutdown() or when every           │
//! │        │ subscriber is gone                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tracker is strictly read-only: fulfillment (kitchen side) is the only
//! writer of post-payment statuses, this loop just mirrors them.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use bistro_core::{OrderProgress, OrderWithLines};
use bistro_db::OrderStore;

// =============================================================================
// Order Snapshot
// =============================================================================

/// One poll result: the persisted order plus the progress derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    /// The order as last read from the store.
    pub order: OrderWithLines,

    /// Step index, percentage, sentence and ETA for the tracking screen.
    pub progress: OrderProgress,
}

// =============================================================================
// Tracker Handle
// =============================================================================

/// Cheap-to-clone handle to a running tracker.
///
/// Dropping every clone stops the background loop on its own; `shutdown`
/// just stops it sooner.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    updates_rx: watch::Receiver<Option<OrderSnapshot>>,
    shutdown_tx: mpsc::Sender<()>,
}

impl TrackerHandle {
    /// A fresh receiver over the snapshot channel. Starts at the latest
    /// snapshot (`None` until the first poll lands).
    pub fn subscribe(&self) -> watch::Receiver<Option<OrderSnapshot>> {
        self.updates_rx.clone()
    }

    /// The most recent snapshot, if any poll has succeeded yet.
    pub fn latest(&self) -> Option<OrderSnapshot> {
        self.updates_rx.borrow().clone()
    }

    /// Asks the tracker to stop. Idempotent; a no-op once it is gone.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

// =============================================================================
// Order Tracker
// =============================================================================

/// Polls a single order and publishes snapshots until shut down.
pub struct OrderTracker {
    store: Arc<dyn OrderStore>,
    order_id: String,
    poll_interval: Duration,
    updates_tx: watch::Sender<Option<OrderSnapshot>>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl OrderTracker {
    /// Starts tracking an order on a background task.
    ///
    /// The first poll fires immediately, so a subscriber usually sees a
    /// snapshot well before the first full interval elapses.
    pub fn spawn(
        store: Arc<dyn OrderStore>,
        order_id: impl Into<String>,
        poll_interval: Duration,
    ) -> TrackerHandle {
        let order_id = order_id.into();
        let (updates_tx, updates_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        info!(
            order_id = %order_id,
            interval = ?poll_interval,
            "Order tracker started"
        );

        let tracker = OrderTracker {
            store,
            order_id,
            poll_interval,
            updates_tx,
            shutdown_rx,
        };
        tokio::spawn(tracker.run());

        TrackerHandle {
            updates_rx,
            shutdown_tx,
        }
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        // A delayed poll should not trigger a burst of catch-up polls
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once().await,
                _ = self.shutdown_rx.recv() => {
                    debug!(order_id = %self.order_id, "Tracker shutdown requested");
                    break;
                }
                _ = self.updates_tx.closed() => {
                    debug!(order_id = %self.order_id, "Last tracker subscriber dropped");
                    break;
                }
            }
        }

        debug!(order_id = %self.order_id, "Order tracker stopped");
    }

    /// One poll: read the order, derive progress, publish.
    ///
    /// A failed read keeps the previous snapshot in place; the tracking
    /// screen shows slightly stale progress rather than an error state.
    async fn poll_once(&self) {
        match self.store.get_order_with_lines(&self.order_id).await {
            Ok(order) => {
                let progress = OrderProgress::for_order(&order.order);
                debug!(
                    order_id = %self.order_id,
                    status = ?order.order.status,
                    step = progress.step_index,
                    "Tracker poll"
                );
                self.updates_tx.send_replace(Some(OrderSnapshot { order, progress }));
            }
            Err(err) => {
                warn!(
                    order_id = %self.order_id,
                    error = %err,
                    "Tracker poll failed, keeping last snapshot"
                );
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
