//! # Catalog Repository
//!
//! Database operations for categories and products.
//!
//! ## Read Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Menu Browsing Flow                                   │
//! │                                                                         │
//! │  Home screen                                                           │
//! │       │                                                                 │
//! │       │  list_categories() ── ordered by sort_order                    │
//! │       ▼                                                                 │
//! │  Category screen                                                       │
//! │       │                                                                 │
//! │       │  list_products_by_category(id) ── available only               │
//! │       ▼                                                                 │
//! │  Product screen                                                        │
//! │       │                                                                 │
//! │       │  get_product(id) ── includes raw options_config JSON           │
//! │       ▼                                                                 │
//! │  OptionSchema::parse() in bistro-core (lenient)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The menu is a few dozen rows, so search is a plain LIKE scan over name
//! and description rather than a full-text index.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;
use bistro_core::{Category, Product};

/// Repository for catalog reads and seed-time writes.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.catalog();
///
/// let categories = repo.list_categories().await?;
/// let burgers = repo.list_products_by_category(&categories[0].id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

// =============================================================================
// Row Structs
// =============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    image_url: Option<String>,
    sort_order: i64,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    category_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    image_url: Option<String>,
    options_config: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            image_url: row.image_url,
            options_config: row.options_config,
            is_available: row.is_available,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists all categories in menu order.
    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, image_url, sort_order, created_at
            FROM categories
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Lists available products in a category, sorted by name.
    ///
    /// Unavailable products are filtered here so they never reach the menu.
    pub async fn list_products_by_category(&self, category_id: &str) -> StoreResult<Vec<Product>> {
        debug!(category_id = %category_id, "Listing products");

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, category_id, name, description, price_cents,
                   image_url, options_config, is_available, created_at
            FROM products
            WHERE category_id = ?1 AND is_available = 1
            ORDER BY name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by ID, available or not.
    ///
    /// The product screen may be reached from an old deep link, so this does
    /// not filter on availability; callers decide what to show.
    pub async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, category_id, name, description, price_cents,
                   image_url, options_config, is_available, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Searches available products by name or description.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> StoreResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_available(limit).await;
        }

        let pattern = format!("%{}%", query);

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, category_id, name, description, price_cents,
                   image_url, options_config, is_available, created_at
            FROM products
            WHERE is_available = 1
              AND (name LIKE ?1 OR description LIKE ?1)
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Lists available products across all categories.
    ///
    /// ## Usage
    /// Called when the search query is empty.
    async fn list_available(&self, limit: u32) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, category_id, name, description, price_cents,
                   image_url, options_config, is_available, created_at
            FROM products
            WHERE is_available = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts all products (available or not).
    ///
    /// ## Usage
    /// The seed binary uses this to skip re-seeding a populated database.
    pub async fn count_products(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a category.
    pub async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, image_url, sort_order, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.image_url)
        .bind(category.sort_order)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a product.
    pub async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, name, description, price_cents,
                image_url, options_config, is_available, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(&product.options_config)
        .bind(product.is_available)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
