//! # Checkout Protocol
//!
//! Turns the session cart into a persisted order.
//!
//! ## Submission Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Phase Machine                             │
//! │                                                                         │
//! │   Idle ──"Payer"──► Validating ──► Submitting ──► Succeeded             │
//! │                         │              │          { order_id, ticket }  │
//! │                         │              │                                │
//! │                         ▼              ▼                                │
//! │                      Failed         Failed                              │
//! │                  (guest fixes    (store trouble;                        │
//! │                   form, retries)  cart kept, retry ok)                  │
//! │                                                                         │
//! │  SUBMITTING, STEP BY STEP:                                             │
//! │  1. ticket  = max issued ticket + 1   (random 1..=1000 on query error) │
//! │  2. totals  = subtotal + VAT          (one computation, stored once)   │
//! │  3. create_order(status = paid)                                        │
//! │  4. create_order_line × N, sequential, cart order                      │
//! │     └─ any failure: delete_order(id) then PartialOrder                 │
//! │  5. clear cart, publish Succeeded                                      │
//! │                                                                         │
//! │  Phases are published on a tokio watch channel; the UI renders         │
//! │  whatever the latest phase is.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no payment capture here: tapping "Payer" IS the payment in this
//! build, which is why orders are born with status `paid`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use bistro_core::validation::{validate_cart, validate_guest_info};
use bistro_core::{
    Cart, GuestInfo, NewOrder, NewOrderLine, OptionResolver, OrderStatus, OrderTotals,
    OrderWithLines, PaymentMethod, Product, TaxRate, ValidationError, ValidationResult,
    DEFAULT_VAT_RATE_BPS, TICKET_FALLBACK_MAX,
};
use bistro_db::{OrderStore, StoreError, StoreResult};

use crate::error::{CheckoutError, CheckoutResult};
use crate::session::CartHandle;

// =============================================================================
// Checkout Phase
// =============================================================================

/// Where a submission attempt currently stands.
///
/// Published over a watch channel: subscribers always see the latest phase,
/// never a backlog. Serialized tagged so the frontend can switch on `phase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// No submission in flight.
    Idle,

    /// Precondition checks are running; no store call made yet.
    Validating,

    /// Order and lines are being written.
    Submitting,

    /// The order is persisted; the cart has already been cleared.
    Succeeded { order_id: String, ticket_number: i64 },

    /// Validation or persistence failed; the cart is untouched.
    Failed { message: String },
}

// =============================================================================
// Checkout Configuration
// =============================================================================

/// Runtime knobs for the checkout service, built from [`crate::AppConfig`]
/// at wiring time.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// VAT rate applied to the cart subtotal.
    pub tax_rate: TaxRate,

    /// Whether add-to-cart rejects unselected required option groups.
    pub enforce_required_options: bool,

    /// Per-call time limit on store operations.
    pub request_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            tax_rate: TaxRate::from_bps(DEFAULT_VAT_RATE_BPS),
            enforce_required_options: false,
            request_timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Owns the submission protocol for one guest session.
///
/// Everything persistence-shaped goes through the [`OrderStore`] trait, so
/// tests drive the protocol against scripted stores.
pub struct CheckoutService {
    /// Order persistence.
    store: Arc<dyn OrderStore>,

    /// The session cart.
    cart: CartHandle,

    /// Runtime knobs.
    config: CheckoutConfig,

    /// Latest phase, published to subscribers.
    phase_tx: watch::Sender<CheckoutPhase>,
}

impl CheckoutService {
    /// Creates a checkout service over a store and a session cart.
    pub fn new(store: Arc<dyn OrderStore>, cart: CartHandle, config: CheckoutConfig) -> Self {
        let (phase_tx, _) = watch::channel(CheckoutPhase::Idle);
        CheckoutService {
            store,
            cart,
            config,
            phase_tx,
        }
    }

    /// Subscribes to phase changes. The receiver starts at the current phase.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutPhase> {
        self.phase_tx.subscribe()
    }

    /// The current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase_tx.borrow().clone()
    }

    /// The session cart handle.
    pub fn cart(&self) -> &CartHandle {
        &self.cart
    }

    /// Finalizes a customization and appends it to the cart, returning the
    /// new line's id.
    ///
    /// With `enforce_required_options` off (the default) this cannot fail:
    /// radio groups always carry a default and checkbox groups are optional.
    pub fn add_to_cart(
        &self,
        product: &Product,
        resolver: OptionResolver,
    ) -> ValidationResult<String> {
        if self.config.enforce_required_options {
            let missing: Vec<String> = resolver
                .missing_required()
                .iter()
                .map(|title| title.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(ValidationError::MissingRequiredOptions { groups: missing });
            }
        }

        let draft = resolver.into_draft(product);
        debug!(
            product = %draft.product_name,
            price = %draft.final_price,
            "Adding line to cart"
        );
        Ok(self.cart.add_item(draft))
    }

    /// Submits the cart as an order.
    ///
    /// ## Protocol
    /// Validates, then writes the order header and its lines sequentially.
    /// On success the cart is cleared before `Succeeded` is published, so a
    /// UI navigating on that phase already sees an empty cart. On any failure
    /// the cart is left exactly as it was.
    pub async fn submit(
        &self,
        guest: &GuestInfo,
        payment: PaymentMethod,
    ) -> CheckoutResult<OrderWithLines> {
        self.set_phase(CheckoutPhase::Validating);

        let snapshot = self.cart.snapshot();
        if let Err(err) = validate_cart(&snapshot).and_then(|_| validate_guest_info(guest)) {
            self.set_phase(CheckoutPhase::Failed {
                message: err.to_string(),
            });
            return Err(err.into());
        }

        self.set_phase(CheckoutPhase::Submitting);

        match self.persist_order(&snapshot, guest, payment).await {
            Ok(confirmation) => {
                self.cart.clear();
                info!(
                    order_id = %confirmation.order.id,
                    ticket = confirmation.order.ticket_number,
                    total = %confirmation.order.total_price(),
                    "Order submitted"
                );
                self.set_phase(CheckoutPhase::Succeeded {
                    order_id: confirmation.order.id.clone(),
                    ticket_number: confirmation.order.ticket_number,
                });
                Ok(confirmation)
            }
            Err(err) => {
                self.set_phase(CheckoutPhase::Failed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Writes the order header, then its lines in cart order.
    async fn persist_order(
        &self,
        cart: &Cart,
        guest: &GuestInfo,
        payment: PaymentMethod,
    ) -> CheckoutResult<OrderWithLines> {
        let ticket_number = self.next_ticket_number().await;
        let totals = OrderTotals::from_subtotal(cart.total_price(), self.config.tax_rate);

        // Guest fields are stored as typed, not as validated: "Marie " keeps
        // its trailing space, "+33 6 12 34 56 78" keeps its grouping.
        let new_order = NewOrder {
            ticket_number,
            customer_id: None,
            guest_name: guest.name.clone(),
            guest_phone: guest.phone.clone(),
            status: OrderStatus::Paid,
            total_price_cents: totals.total.cents(),
            payment_method: payment,
        };

        let order = self.bounded(self.store.create_order(&new_order)).await?;
        debug!(
            order_id = %order.id,
            lines = cart.items().len(),
            "Order header written, inserting lines"
        );

        let mut lines = Vec::with_capacity(cart.items().len());
        for item in cart.items() {
            let new_line = NewOrderLine {
                order_id: order.id.clone(),
                product_id: item.product_id.clone(),
                name_snapshot: item.product_name.clone(),
                quantity: item.quantity,
                unit_price_cents: item.final_price.cents(),
                selected_options: item.customization.clone(),
            };

            match self.bounded(self.store.create_order_line(&new_line)).await {
                Ok(line) => lines.push(line),
                Err(err) => {
                    warn!(
                        order_id = %order.id,
                        product = %item.product_name,
                        error = %err,
                        "Line insert failed, rolling back order"
                    );
                    self.roll_back(&order.id).await;
                    return Err(CheckoutError::PartialOrder { order_id: order.id });
                }
            }
        }

        Ok(OrderWithLines { order, lines })
    }

    /// Next counter ticket: one past the highest ever issued, starting at 1.
    ///
    /// When the query fails the guest still gets an order: a random ticket in
    /// 1..=[`TICKET_FALLBACK_MAX`] is issued instead. Collisions with live
    /// tickets are possible and accepted; the failure is logged, never
    /// surfaced.
    async fn next_ticket_number(&self) -> i64 {
        match self.bounded(self.store.max_issued_ticket_number()).await {
            Ok(Some(max)) => max + 1,
            Ok(None) => 1,
            Err(err) => {
                let fallback = rand::thread_rng().gen_range(1..=TICKET_FALLBACK_MAX);
                warn!(
                    error = %err,
                    fallback,
                    "Ticket query failed, issuing random ticket"
                );
                fallback
            }
        }
    }

    /// Best-effort deletion of a half-written order.
    async fn roll_back(&self, order_id: &str) {
        if let Err(err) = self.bounded(self.store.delete_order(order_id)).await {
            warn!(
                order_id = %order_id,
                error = %err,
                "Rollback failed, orphan order left behind"
            );
        }
    }

    /// Runs a store call under the configured time limit.
    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match tokio::time::timeout(self.config.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Internal(format!(
                "store call timed out after {:?}",
                self.config.request_timeout
            ))),
        }
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        debug!(?phase, "Checkout phase");
        self.phase_tx.send_replace(phase);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    use bistro_core::{
        Category, Customization, GroupKind, LineItemDraft, Money, OptionGroup, OptionSchema,
        OptionValue, Order, OrderLine, SelectedValues,
    };
    use bistro_db::{Database, DbConfig};

    // =========================================================================
    // Scripted Stores
    // =========================================================================

    /// Counts every store call and fails it; used to prove validation
    /// failures never reach persistence.
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn touch<T>(&self) -> StoreResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Internal("no store call expected".into()))
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderStore for CountingStore {
        async fn list_categories(&self) -> StoreResult<Vec<Category>> {
            self.touch()
        }
        async fn list_products_by_category(&self, _: &str) -> StoreResult<Vec<Product>> {
            self.touch()
        }
        async fn create_order(&self, _: &NewOrder) -> StoreResult<Order> {
            self.touch()
        }
        async fn create_order_line(&self, _: &NewOrderLine) -> StoreResult<OrderLine> {
            self.touch()
        }
        async fn get_order_with_lines(&self, _: &str) -> StoreResult<OrderWithLines> {
            self.touch()
        }
        async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>> {
            self.touch()
        }
        async fn delete_order(&self, _: &str) -> StoreResult<()> {
            self.touch()
        }
        async fn update_order_status(&self, _: &str, _: OrderStatus) -> StoreResult<()> {
            self.touch()
        }
    }

    /// Store whose ticket query always fails; order writes succeed and are
    /// recorded for assertions.
    #[derive(Default)]
    struct BrokenTicketStore {
        recorded: Mutex<Option<NewOrder>>,
    }

    #[async_trait]
    impl OrderStore for BrokenTicketStore {
        async fn list_categories(&self) -> StoreResult<Vec<Category>> {
            unimplemented!()
        }
        async fn list_products_by_category(&self, _: &str) -> StoreResult<Vec<Product>> {
            unimplemented!()
        }
        async fn create_order(&self, new_order: &NewOrder) -> StoreResult<Order> {
            *self.recorded.lock().unwrap() = Some(new_order.clone());
            Ok(Order {
                id: Uuid::new_v4().to_string(),
                ticket_number: new_order.ticket_number,
                customer_id: new_order.customer_id.clone(),
                guest_name: new_order.guest_name.clone(),
                guest_phone: new_order.guest_phone.clone(),
                status: new_order.status,
                total_price_cents: new_order.total_price_cents,
                payment_method: new_order.payment_method,
                created_at: Utc::now(),
            })
        }
        async fn create_order_line(&self, new_line: &NewOrderLine) -> StoreResult<OrderLine> {
            Ok(OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: new_line.order_id.clone(),
                product_id: new_line.product_id.clone(),
                name_snapshot: new_line.name_snapshot.clone(),
                quantity: new_line.quantity,
                unit_price_cents: new_line.unit_price_cents,
                selected_options: new_line.selected_options.clone(),
                created_at: Utc::now(),
            })
        }
        async fn get_order_with_lines(&self, _: &str) -> StoreResult<OrderWithLines> {
            unimplemented!()
        }
        async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>> {
            Err(StoreError::QueryFailed("simulated outage".into()))
        }
        async fn delete_order(&self, _: &str) -> StoreResult<()> {
            Ok(())
        }
        async fn update_order_status(&self, _: &str, _: OrderStatus) -> StoreResult<()> {
            unimplemented!()
        }
    }

    /// Store where every call hangs forever; exercises the per-call timeout.
    struct HangingStore;

    #[async_trait]
    impl OrderStore for HangingStore {
        async fn list_categories(&self) -> StoreResult<Vec<Category>> {
            std::future::pending().await
        }
        async fn list_products_by_category(&self, _: &str) -> StoreResult<Vec<Product>> {
            std::future::pending().await
        }
        async fn create_order(&self, _: &NewOrder) -> StoreResult<Order> {
            std::future::pending().await
        }
        async fn create_order_line(&self, _: &NewOrderLine) -> StoreResult<OrderLine> {
            std::future::pending().await
        }
        async fn get_order_with_lines(&self, _: &str) -> StoreResult<OrderWithLines> {
            std::future::pending().await
        }
        async fn max_issued_ticket_number(&self) -> StoreResult<Option<i64>> {
            std::future::pending().await
        }
        async fn delete_order(&self, _: &str) -> StoreResult<()> {
            std::future::pending().await
        }
        async fn update_order_status(&self, _: &str, _: OrderStatus) -> StoreResult<()> {
            std::future::pending().await
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64) -> Product {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: "Burgers".to_string(),
            image_url: None,
            sort_order: 0,
            created_at: Utc::now(),
        };
        db.catalog().insert_category(&category).await.unwrap();

        let product = Product {
            id: Uuid::new_v4().to_string(),
            category_id: category.id,
            name: name.to_string(),
            description: None,
            price_cents,
            image_url: None,
            options_config: None,
            is_available: true,
            created_at: Utc::now(),
        };
        db.catalog().insert_product(&product).await.unwrap();
        product
    }

    fn service_over(store: Arc<dyn OrderStore>) -> CheckoutService {
        CheckoutService::new(store, CartHandle::new(), CheckoutConfig::default())
    }

    fn guest() -> GuestInfo {
        GuestInfo::new("Claire Martin", "+33 6 12 34 56 78")
    }

    fn draft(name: &str, cents: i64) -> LineItemDraft {
        LineItemDraft {
            product_id: format!("prod-{name}"),
            product_name: name.to_string(),
            base_price: Money::from_cents(cents),
            final_price: Money::from_cents(cents),
            customization: Customization::new(),
            image_url: None,
        }
    }

    fn supplements_schema() -> OptionSchema {
        OptionSchema::from_groups(vec![OptionGroup {
            title: "Suppléments".to_string(),
            kind: GroupKind::Checkbox,
            values: vec![
                OptionValue {
                    label: "Bacon".to_string(),
                    price_extra_cents: 150,
                },
                OptionValue {
                    label: "Cheddar".to_string(),
                    price_extra_cents: 100,
                },
            ],
            required: true,
        }])
    }

    fn taille_schema() -> OptionSchema {
        OptionSchema::from_groups(vec![OptionGroup {
            title: "Taille".to_string(),
            kind: GroupKind::Radio,
            values: vec![
                OptionValue {
                    label: "33cl".to_string(),
                    price_extra_cents: 0,
                },
                OptionValue {
                    label: "50cl".to_string(),
                    price_extra_cents: 50,
                },
            ],
            required: false,
        }])
    }

    // =========================================================================
    // Validation Gate
    // =========================================================================

    #[tokio::test]
    async fn test_empty_cart_never_reaches_the_store() {
        let store = Arc::new(CountingStore::default());
        let service = service_over(store.clone());

        let err = service.submit(&guest(), PaymentMethod::CreditCard).await;

        assert!(matches!(
            err,
            Err(CheckoutError::Validation(ValidationError::EmptyCart))
        ));
        assert_eq!(store.call_count(), 0);
        assert_eq!(
            service.phase(),
            CheckoutPhase::Failed {
                message: "cart is empty".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_bad_guest_info_never_reaches_the_store() {
        let store = Arc::new(CountingStore::default());
        let service = service_over(store.clone());
        service.cart().add_item(draft("Burger", 1000));

        let blank_name = GuestInfo::new("   ", "0612345678");
        let err = service
            .submit(&blank_name, PaymentMethod::CreditCard)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingGuestInfo { field: "name" })
        ));

        let short_phone = GuestInfo::new("Claire", "06123");
        let err = service
            .submit(&short_phone, PaymentMethod::CreditCard)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InvalidPhone { .. })
        ));

        assert_eq!(store.call_count(), 0);
        // Failed submissions leave the cart alone
        assert_eq!(service.cart().item_count(), 1);
    }

    // =========================================================================
    // Required Options Policy
    // =========================================================================

    #[tokio::test]
    async fn test_required_options_advisory_by_default() {
        let service = service_over(Arc::new(CountingStore::default()));
        let product = Product {
            id: "prod-1".to_string(),
            category_id: "cat-1".to_string(),
            name: "Burger".to_string(),
            description: None,
            price_cents: 1000,
            image_url: None,
            options_config: None,
            is_available: true,
            created_at: Utc::now(),
        };

        // Required checkbox group, nothing selected: accepted by default
        let resolver = OptionResolver::new(Money::from_cents(1000), supplements_schema());
        let id = service.add_to_cart(&product, resolver).unwrap();
        assert!(!id.is_empty());
        assert_eq!(service.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_required_options_enforced_when_enabled() {
        let config = CheckoutConfig {
            enforce_required_options: true,
            ..Default::default()
        };
        let service = CheckoutService::new(
            Arc::new(CountingStore::default()),
            CartHandle::new(),
            config,
        );
        let product = Product {
            id: "prod-1".to_string(),
            category_id: "cat-1".to_string(),
            name: "Burger".to_string(),
            description: None,
            price_cents: 1000,
            image_url: None,
            options_config: None,
            is_available: true,
            created_at: Utc::now(),
        };

        let resolver = OptionResolver::new(Money::from_cents(1000), supplements_schema());
        let err = service.add_to_cart(&product, resolver.clone()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredOptions {
                groups: vec!["Suppléments".to_string()]
            }
        );
        assert!(service.cart().is_empty());

        // Selecting any value satisfies the group
        let mut resolver = resolver;
        resolver.toggle_checkbox("Suppléments", "Bacon");
        let id = service.add_to_cart(&product, resolver).unwrap();
        assert!(!id.is_empty());
        let line = service.cart().snapshot().items()[0].clone();
        assert_eq!(line.final_price.cents(), 1150);
    }

    // =========================================================================
    // Happy Path (real store)
    // =========================================================================

    #[tokio::test]
    async fn test_submit_persists_order_and_clears_cart() {
        let db = test_db().await;
        let burger = seed_product(&db, "Burger Classique", 1000).await;
        let drink = seed_product(&db, "Limonade", 500).await;
        let store: Arc<dyn OrderStore> = Arc::new(db.clone());
        let service = CheckoutService::new(store, CartHandle::new(), CheckoutConfig::default());

        // 1 × 10.00 as-is, then 2 × 5.00 with its radio default riding along
        service.cart().add_item(LineItemDraft::for_product(&burger));
        let resolver = OptionResolver::new(drink.price(), taille_schema());
        let drink_line = service.add_to_cart(&drink, resolver).unwrap();
        service.cart().update_quantity(&drink_line, 2);
        assert_eq!(service.cart().item_count(), 3);

        let confirmation = service
            .submit(&guest(), PaymentMethod::CreditCard)
            .await
            .unwrap();

        // Subtotal 20.00 → VAT 4.00 → total 24.00; first ticket is 1
        assert_eq!(confirmation.order.ticket_number, 1);
        assert_eq!(confirmation.order.status, OrderStatus::Paid);
        assert_eq!(confirmation.order.total_price_cents, 2400);
        assert_eq!(confirmation.order.customer_id, None);
        assert_eq!(confirmation.order.guest_name, "Claire Martin");
        assert_eq!(confirmation.subtotal().cents(), 2000);

        // Lines persisted in cart order with frozen name/price snapshots
        let stored = db
            .orders()
            .get_order_with_lines(&confirmation.order.id)
            .await
            .unwrap();
        assert_eq!(stored.order.total_price_cents, 2400);
        assert_eq!(stored.lines.len(), 2);
        assert_eq!(stored.lines[0].name_snapshot, "Burger Classique");
        assert_eq!(stored.lines[0].quantity, 1);
        assert_eq!(stored.lines[0].unit_price_cents, 1000);
        assert_eq!(stored.lines[1].quantity, 2);
        assert_eq!(stored.lines[1].unit_price_cents, 500);
        assert_eq!(
            stored.lines[1].selected_options.get("Taille"),
            Some(&SelectedValues::One("33cl".to_string()))
        );

        // Cart cleared, phase Succeeded
        assert!(service.cart().is_empty());
        assert_eq!(service.cart().item_count(), 0);
        assert_eq!(
            service.phase(),
            CheckoutPhase::Succeeded {
                order_id: confirmation.order.id.clone(),
                ticket_number: 1
            }
        );
    }

    #[tokio::test]
    async fn test_ticket_continues_from_highest_issued() {
        let db = test_db().await;
        let product = seed_product(&db, "Burger", 1000).await;
        let store: Arc<dyn OrderStore> = Arc::new(db.clone());

        // A prior order holds ticket 41
        db.orders()
            .create_order(&NewOrder {
                ticket_number: 41,
                customer_id: None,
                guest_name: "Ancien Client".to_string(),
                guest_phone: "0611111111".to_string(),
                status: OrderStatus::Completed,
                total_price_cents: 1200,
                payment_method: PaymentMethod::CreditCard,
            })
            .await
            .unwrap();

        let service = CheckoutService::new(store, CartHandle::new(), CheckoutConfig::default());
        service.cart().add_item(LineItemDraft::for_product(&product));

        let confirmation = service
            .submit(&guest(), PaymentMethod::Mobile)
            .await
            .unwrap();
        assert_eq!(confirmation.order.ticket_number, 42);
    }

    #[tokio::test]
    async fn test_ticket_falls_back_to_random_on_query_failure() {
        let store = Arc::new(BrokenTicketStore::default());
        let service = service_over(store.clone());
        service.cart().add_item(draft("Burger", 1000));

        let confirmation = service
            .submit(&guest(), PaymentMethod::CreditCard)
            .await
            .unwrap();

        // Submission survives the outage with a random ticket in 1..=1000
        let recorded = store.recorded.lock().unwrap().clone().unwrap();
        assert!((1..=TICKET_FALLBACK_MAX).contains(&recorded.ticket_number));
        assert_eq!(confirmation.order.ticket_number, recorded.ticket_number);
        assert_eq!(recorded.total_price_cents, 1200);
    }

    // =========================================================================
    // Saga Rollback
    // =========================================================================

    #[tokio::test]
    async fn test_line_failure_rolls_back_the_order() {
        let db = test_db().await;
        let product = seed_product(&db, "Burger", 1000).await;
        let store: Arc<dyn OrderStore> = Arc::new(db.clone());
        let service = CheckoutService::new(store, CartHandle::new(), CheckoutConfig::default());

        // First line is valid; second references a product that does not
        // exist, so its insert fails the foreign key check
        service.cart().add_item(LineItemDraft::for_product(&product));
        let mut ghost = draft("Fantôme", 500);
        ghost.product_id = "no-such-product".to_string();
        service.cart().add_item(ghost);

        let err = service
            .submit(&guest(), PaymentMethod::CreditCard)
            .await
            .unwrap_err();

        let CheckoutError::PartialOrder { order_id } = &err else {
            panic!("expected PartialOrder, got {err:?}");
        };
        assert!(err.is_retryable());

        // Rollback removed the order and its already-written line
        let lookup = db.orders().get_order_with_lines(order_id).await;
        assert!(matches!(lookup, Err(StoreError::NotFound { .. })));

        // Cart kept so the guest can fix it and resubmit
        assert_eq!(service.cart().item_count(), 2);
        assert!(matches!(service.phase(), CheckoutPhase::Failed { .. }));
    }

    // =========================================================================
    // Timeouts
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_hung_store_times_out_instead_of_blocking() {
        let config = CheckoutConfig {
            request_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let service = CheckoutService::new(Arc::new(HangingStore), CartHandle::new(), config);
        service.cart().add_item(draft("Burger", 1000));

        // The hung ticket query falls back to a random ticket; the hung
        // create_order is what surfaces as a persistence error
        let err = service
            .submit(&guest(), PaymentMethod::CreditCard)
            .await
            .unwrap_err();

        let CheckoutError::Persistence(store_err) = &err else {
            panic!("expected Persistence, got {err:?}");
        };
        assert!(store_err.to_string().contains("timed out"));
        assert_eq!(service.cart().item_count(), 1);
    }

    // =========================================================================
    // Phase Channel
    // =========================================================================

    #[tokio::test]
    async fn test_phase_starts_idle_and_serializes_tagged() {
        let service = service_over(Arc::new(CountingStore::default()));
        assert_eq!(service.phase(), CheckoutPhase::Idle);

        let rx = service.subscribe();
        assert_eq!(*rx.borrow(), CheckoutPhase::Idle);

        let json = serde_json::to_string(&CheckoutPhase::Succeeded {
            order_id: "abc".to_string(),
            ticket_number: 7,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"phase":"succeeded","order_id":"abc","ticket_number":7}"#
        );
    }
}
