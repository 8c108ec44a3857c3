//! # Guest Session Simulator
//!
//! Walks one guest session end to end against a real database: browse the
//! menu, customize a product, fill the cart, check out, then follow the
//! order live while a pretend kitchen advances it.
//!
//! ## Usage
//! ```bash
//! # Throwaway in-memory database with a mini menu
//! cargo run -p bistro-app --bin simulate
//!
//! # Against a seeded database file
//! cargo run -p bistro-app --bin simulate -- --db ./bistro_dev.db
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use bistro_app::{
    init_tracing, AppConfig, CartHandle, CheckoutConfig, CheckoutService, OrderTracker,
};
use bistro_core::{
    Category, Eta, GroupKind, GuestInfo, LineItemDraft, OptionGroup, OptionResolver, OptionSchema,
    OptionValue, OrderStatus, OrderTotals, PaymentMethod, Product,
};
use bistro_db::{Database, DbConfig, OrderStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bistro Guest Session Simulator");
                println!();
                println!("Usage: simulate [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: in-memory)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();

    let config = AppConfig::load_or_default(None);

    println!("🍔 Bistro Guest Session Simulator");
    println!("=================================");
    match &db_path {
        Some(path) => println!("Database: {}", path),
        None => println!("Database: in-memory (throwaway)"),
    }
    println!();

    let db_config = match &db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::in_memory(),
    };
    let db = Database::new(db_config).await?;
    println!("✓ Connected, migrations applied");

    if db.catalog().count_products().await? == 0 {
        seed_demo_menu(&db).await?;
        println!("✓ Seeded demo menu");
    }

    // ── Browse ───────────────────────────────────────────────────────────

    let categories = db.catalog().list_categories().await?;
    let mut products = Vec::new();
    for category in &categories {
        products.extend(db.catalog().list_products_by_category(&category.id).await?);
    }

    let featured = products
        .iter()
        .find(|p| p.options_config.is_some())
        .or_else(|| products.first())
        .cloned()
        .ok_or("catalog is empty")?;
    let side = products.iter().find(|p| p.id != featured.id).cloned();

    println!();
    println!("Menu: {} products in {} categories", products.len(), categories.len());
    println!();
    println!("Customizing: {} ({})", featured.name, featured.price());

    // ── Customize ────────────────────────────────────────────────────────

    let schema = OptionSchema::for_product(&featured);
    let mut resolver = OptionResolver::new(featured.price(), schema.clone());
    for group in schema.groups() {
        match group.kind {
            GroupKind::Radio => {
                // The first value is preselected; pick the last to show a choice
                if let Some(value) = group.values.last() {
                    resolver.select_radio(&group.title, &value.label);
                    println!("  • {}: {}", group.title, value.label);
                }
            }
            GroupKind::Checkbox => {
                if let Some(value) = group.values.first() {
                    resolver.toggle_checkbox(&group.title, &value.label);
                    println!("  • {} (+{})", value.label, value.price_extra());
                }
            }
        }
    }
    println!("  = {} with options", resolver.total_price());

    // ── Cart ─────────────────────────────────────────────────────────────

    let store: Arc<dyn OrderStore> = Arc::new(db.clone());
    let cart = CartHandle::new();
    let checkout = CheckoutService::new(
        store.clone(),
        cart.clone(),
        CheckoutConfig {
            tax_rate: config.tax_rate(),
            enforce_required_options: config.checkout.enforce_required_options,
            request_timeout: config.request_timeout(),
        },
    );

    let line_id = checkout.add_to_cart(&featured, resolver)?;
    cart.update_quantity(&line_id, 2);
    if let Some(side) = &side {
        cart.add_item(LineItemDraft::for_product(side));
    }

    println!();
    println!("Cart:");
    let snapshot = cart.snapshot();
    for item in snapshot.items() {
        println!(
            "  {} × {:<24} {}",
            item.quantity,
            item.product_name,
            item.final_price.multiply_quantity(item.quantity)
        );
    }
    let totals = OrderTotals::from_subtotal(snapshot.total_price(), config.tax_rate());
    println!("  {:<28} {}", "Sous-total", totals.subtotal);
    println!("  {:<28} {}", "TVA", totals.tax);
    println!("  {:<28} {}", "Total", totals.total);

    // ── Checkout ─────────────────────────────────────────────────────────

    let guest = GuestInfo::new("Claire Martin", "+33 6 12 34 56 78");
    let confirmation = checkout.submit(&guest, PaymentMethod::CreditCard).await?;

    println!();
    println!("✓ Order placed");
    println!("  Ticket:  n° {}", confirmation.order.ticket_number);
    println!("  Total:   {}", confirmation.order.total_price());
    println!("  Lines:   {}", confirmation.lines.len());
    println!("  Cart after checkout: {} items", cart.item_count());

    // ── Track ────────────────────────────────────────────────────────────

    println!();
    println!("Tracking (kitchen simulated)...");

    let tracker = OrderTracker::spawn(
        store.clone(),
        confirmation.order.id.clone(),
        Duration::from_secs(1),
    );

    // Pretend kitchen: advance the order every couple of seconds
    let kitchen_store = store.clone();
    let kitchen_order = confirmation.order.id.clone();
    let kitchen = tokio::spawn(async move {
        for status in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            tokio::time::sleep(Duration::from_secs(2)).await;
            if let Err(err) = kitchen_store.update_order_status(&kitchen_order, status).await {
                eprintln!("kitchen update failed: {err}");
                return;
            }
        }
    });

    let mut updates = tracker.subscribe();
    let followed = tokio::time::timeout(Duration::from_secs(30), async {
        let mut last_step = usize::MAX;
        loop {
            if let Some(snapshot) = updates.borrow_and_update().clone() {
                if snapshot.progress.step_index != last_step {
                    last_step = snapshot.progress.step_index;
                    let eta = match &snapshot.progress.eta {
                        Some(Eta::Now) => "  (prête au comptoir)".to_string(),
                        Some(Eta::At(at)) => format!("  (prête vers {})", at.format("%H:%M")),
                        None => String::new(),
                    };
                    println!(
                        "  [{}%] {}{}",
                        snapshot.progress.percent, snapshot.progress.sentence, eta
                    );
                }
                if snapshot.order.order.status == OrderStatus::Completed {
                    break;
                }
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
    })
    .await;

    if followed.is_err() {
        println!("⚠ Gave up waiting for the order to complete");
    }

    kitchen.await?;
    tracker.shutdown().await;
    db.close().await;

    println!();
    println!("✓ Session complete!");

    Ok(())
}

/// Two products are enough for the walkthrough: one customizable, one plain.
async fn seed_demo_menu(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let burgers = Category {
        id: Uuid::new_v4().to_string(),
        name: "Burgers".to_string(),
        image_url: None,
        sort_order: 1,
        created_at: Utc::now(),
    };
    db.catalog().insert_category(&burgers).await?;

    let schema = OptionSchema::from_groups(vec![
        OptionGroup {
            title: "Cuisson".to_string(),
            kind: GroupKind::Radio,
            values: vec![
                OptionValue {
                    label: "Saignant".to_string(),
                    price_extra_cents: 0,
                },
                OptionValue {
                    label: "À point".to_string(),
                    price_extra_cents: 0,
                },
                OptionValue {
                    label: "Bien cuit".to_string(),
                    price_extra_cents: 0,
                },
            ],
            required: false,
        },
        OptionGroup {
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
            required: false,
        },
    ]);

    db.catalog()
        .insert_product(&Product {
            id: Uuid::new_v4().to_string(),
            category_id: burgers.id.clone(),
            name: "Burger Classique".to_string(),
            description: Some("Steak haché, salade, tomate, oignons".to_string()),
            price_cents: 850,
            image_url: None,
            options_config: Some(schema.to_json()),
            is_available: true,
            created_at: Utc::now(),
        })
        .await?;

    let boissons = Category {
        id: Uuid::new_v4().to_string(),
        name: "Boissons".to_string(),
        image_url: None,
        sort_order: 2,
        created_at: Utc::now(),
    };
    db.catalog().insert_category(&boissons).await?;

    db.catalog()
        .insert_product(&Product {
            id: Uuid::new_v4().to_string(),
            category_id: boissons.id.clone(),
            name: "Limonade artisanale".to_string(),
            description: Some("Citron pressé maison".to_string()),
            price_cents: 300,
            image_url: None,
            options_config: None,
            is_available: true,
            created_at: Utc::now(),
        })
        .await?;

    Ok(())
}
