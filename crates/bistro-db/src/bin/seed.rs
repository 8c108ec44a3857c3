//! # Seed Data Generator
//!
//! Populates the database with the demo menu for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p bistro-db --bin seed
//!
//! # Specify database path
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro.db
//! ```
//!
//! ## Generated Menu
//! Four categories of a small French bistro:
//! - Burgers (cuisson + suppléments options)
//! - Menus (boisson + accompagnement options)
//! - Boissons (taille option)
//! - Desserts
//!
//! Option schemas are built with the typed [`OptionGroup`] structs and
//! serialized through [`OptionSchema::to_json`], so the seed can never write
//! a blob the client would reject.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use bistro_core::{Category, GroupKind, OptionGroup, OptionSchema, OptionValue, Product};
use bistro_db::{Database, DbConfig};

/// One menu entry: name, description, price in cents, option groups.
struct MenuItem {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    groups: Vec<OptionGroup>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bistro_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bistro Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bistro_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bistro Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.catalog().count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding menu...");

    let mut seeded = 0;
    for (sort_order, (category_name, items)) in menu().into_iter().enumerate() {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: category_name.to_string(),
            image_url: None,
            sort_order: sort_order as i64 + 1,
            created_at: Utc::now(),
        };
        db.catalog().insert_category(&category).await?;

        for item in items {
            let options_config = if item.groups.is_empty() {
                None
            } else {
                Some(OptionSchema::from_groups(item.groups).to_json())
            };

            let product = Product {
                id: Uuid::new_v4().to_string(),
                category_id: category.id.clone(),
                name: item.name.to_string(),
                description: Some(item.description.to_string()),
                price_cents: item.price_cents,
                image_url: None,
                options_config,
                is_available: true,
                created_at: Utc::now(),
            };
            db.catalog().insert_product(&product).await?;
            seeded += 1;
        }

        println!("  ✓ {}", category_name);
    }

    println!();
    println!("✓ Seeded {} products", seeded);

    // Verify the catalog reads back
    let categories = db.catalog().list_categories().await?;
    println!("  Categories: {}", categories.len());

    let hits = db.catalog().search("burger", 10).await?;
    println!("  Search 'burger': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn radio(title: &str, labels: &[(&str, i64)]) -> OptionGroup {
    OptionGroup {
        title: title.to_string(),
        kind: GroupKind::Radio,
        values: labels
            .iter()
            .map(|(label, extra)| OptionValue {
                label: label.to_string(),
                price_extra_cents: *extra,
            })
            .collect(),
        required: false,
    }
}

fn checkbox(title: &str, labels: &[(&str, i64)]) -> OptionGroup {
    OptionGroup {
        title: title.to_string(),
        kind: GroupKind::Checkbox,
        values: labels
            .iter()
            .map(|(label, extra)| OptionValue {
                label: label.to_string(),
                price_extra_cents: *extra,
            })
            .collect(),
        required: false,
    }
}

/// The demo menu, in display order.
fn menu() -> Vec<(&'static str, Vec<MenuItem>)> {
    vec![
        (
            "Burgers",
            vec![
                MenuItem {
                    name: "Burger Classique",
                    description: "Steak haché, salade, tomate, oignons",
                    price_cents: 850,
                    groups: vec![
                        radio(
                            "Cuisson",
                            &[("Saignant", 0), ("À point", 0), ("Bien cuit", 0)],
                        ),
                        checkbox(
                            "Suppléments",
                            &[("Bacon", 150), ("Cheddar", 100), ("Oeuf", 100)],
                        ),
                    ],
                },
                MenuItem {
                    name: "Burger Végétarien",
                    description: "Galette de légumes, avocat, roquette",
                    price_cents: 900,
                    groups: vec![checkbox(
                        "Suppléments",
                        &[("Cheddar", 100), ("Oeuf", 100)],
                    )],
                },
                MenuItem {
                    name: "Le Bistro Burger",
                    description: "Boeuf charolais, reblochon, oignons confits",
                    price_cents: 1150,
                    groups: vec![
                        radio(
                            "Cuisson",
                            &[("Saignant", 0), ("À point", 0), ("Bien cuit", 0)],
                        ),
                        checkbox("Suppléments", &[("Bacon", 150), ("Oeuf", 100)]),
                    ],
                },
            ],
        ),
        (
            "Menus",
            vec![
                MenuItem {
                    name: "Menu Classique",
                    description: "Burger Classique, accompagnement et boisson",
                    price_cents: 1250,
                    groups: vec![
                        radio(
                            "Accompagnement",
                            &[("Frites", 0), ("Salade", 0), ("Potatoes", 50)],
                        ),
                        radio(
                            "Boisson",
                            &[("Coca-Cola", 0), ("Limonade", 0), ("Eau pétillante", 0)],
                        ),
                    ],
                },
                MenuItem {
                    name: "Menu Enfant",
                    description: "Petit burger, frites et jus de fruit",
                    price_cents: 750,
                    groups: vec![radio(
                        "Boisson",
                        &[("Jus de pomme", 0), ("Jus d'orange", 0), ("Eau", 0)],
                    )],
                },
            ],
        ),
        (
            "Boissons",
            vec![
                MenuItem {
                    name: "Coca-Cola",
                    description: "Frais",
                    price_cents: 250,
                    groups: vec![radio("Taille", &[("33cl", 0), ("50cl", 50)])],
                },
                MenuItem {
                    name: "Limonade artisanale",
                    description: "Citron pressé maison",
                    price_cents: 300,
                    groups: vec![],
                },
                MenuItem {
                    name: "Eau minérale",
                    description: "Plate ou pétillante",
                    price_cents: 150,
                    groups: vec![radio("Type", &[("Plate", 0), ("Pétillante", 0)])],
                },
                MenuItem {
                    name: "Café",
                    description: "Expresso ou allongé",
                    price_cents: 180,
                    groups: vec![],
                },
            ],
        ),
        (
            "Desserts",
            vec![
                MenuItem {
                    name: "Mousse au chocolat",
                    description: "Chocolat noir 70%",
                    price_cents: 350,
                    groups: vec![],
                },
                MenuItem {
                    name: "Tarte aux pommes",
                    description: "Servie tiède",
                    price_cents: 400,
                    groups: vec![checkbox("Extras", &[("Chantilly", 50)])],
                },
                MenuItem {
                    name: "Glace deux boules",
                    description: "Au choix",
                    price_cents: 300,
                    groups: vec![checkbox(
                        "Parfums",
                        &[("Vanille", 0), ("Chocolat", 0), ("Fraise", 0)],
                    )],
                },
            ],
        ),
    ]
}
