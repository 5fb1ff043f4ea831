//! # Product Repository
//!
//! Database operations for the parts catalog.
//!
//! ## Key Operations
//! - CRUD operations
//! - Substring search across name, SKU, and vehicle-fitment fields
//! - Manual stock adjustment (the path OUTSIDE the checkout engine)
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Works                             │
//! │                                                                         │
//! │  User types: "abs sensor"                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%abs sensor%' across: name, sku, make, model, variant           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ ABS-AUDI-001 | ABS Sensor Front Left   │ ← MATCH!                  │
//! │  │ ABS-AUDI-002 | ABS Sensor Front Right  │ ← MATCH!                  │
//! │  │ FLT-VW-010   | Oil Filter              │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Ranking quality is a non-goal; this is a back-office lookup.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use partsdesk_core::validation::{validate_product_name, validate_search_query, validate_sku};
use partsdesk_core::Product;

/// Columns selected for every product query; keep in sync with the
/// `Product` struct.
const PRODUCT_COLUMNS: &str = "id, sku, name, brand, make, model, variant, category, \
     purchase_price_cents, sale_price_cents, tax_rate_bps, stock, created_at, updated_at";

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Search products
/// let results = repo.search("abs sensor", 20).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches the catalog with a case-insensitive substring match.
    ///
    /// ## How It Works
    /// Matches across: name, SKU, make, model, variant. An empty query
    /// returns products sorted by name.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 OR sku LIKE ?1 OR make LIKE ?1 \
                OR model LIKE ?1 OR variant LIKE ?1 \
             ORDER BY name LIMIT ?2"
        );

        let products: Vec<Product> = sqlx::query_as(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products sorted by name (no search filter).
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name LIMIT ?1");

        let products: Vec<Product> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product: Option<Product> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");

        let product: Option<Product> = sqlx::query_as(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::Validation)` - Malformed SKU or name
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        validate_sku(&product.sku)?;
        validate_product_name(&product.name)?;

        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (\
                 id, sku, name, brand, make, model, variant, category, \
                 purchase_price_cents, sale_price_cents, tax_rate_bps, stock, \
                 created_at, updated_at\
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.make)
        .bind(&product.model)
        .bind(&product.variant)
        .bind(&product.category)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.tax_rate_bps)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields.
    ///
    /// ## Note
    /// Stock is deliberately NOT part of this update: it moves only via
    /// the checkout engine's conditional decrement or [`Self::set_stock`].
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::Validation)` - Malformed SKU or name
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_sku(&product.sku)?;
        validate_product_name(&product.name)?;

        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 sku = ?2, name = ?3, brand = ?4, make = ?5, model = ?6, \
                 variant = ?7, category = ?8, purchase_price_cents = ?9, \
                 sale_price_cents = ?10, tax_rate_bps = ?11, updated_at = ?12 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.make)
        .bind(&product.model)
        .bind(&product.variant)
        .bind(&product.category)
        .bind(product.purchase_price_cents)
        .bind(product.sale_price_cents)
        .bind(product.tax_rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Manual stock adjustment (stocktake correction).
    ///
    /// ## This Is Not The Checkout Path
    /// Checkout decrements stock conditionally inside its own transaction.
    /// This sets an absolute count and exists for the back-office
    /// correction workflow only. Negative values are rejected by the
    /// schema's CHECK constraint.
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock = %stock, "Adjusting stock manually");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
