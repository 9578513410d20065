//! # Product Repository
//!
//! Database operations for the auto-parts catalog, including the
//! conditional stock write the reconciler's retry loop is built on.
//!
//! ## The Conditional Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How Concurrent Stock Writes Serialize                      │
//! │                                                                         │
//! │  Writer A read quantity = 10          Writer B read quantity = 10      │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  UPDATE ... SET quantity = 4          UPDATE ... SET quantity = 4      │
//! │  WHERE id = ?1 AND quantity = 10      WHERE id = ?1 AND quantity = 10  │
//! │       │                                    │                            │
//! │  rows_affected = 1 → Applied          rows_affected = 0 → Stale        │
//! │                                            │                            │
//! │                                       re-read, re-guard, retry          │
//! │                                                                         │
//! │  SQLite runs each UPDATE atomically, so exactly one guard can match.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kardex_core::{Product, ProductId};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with an initial stock level.
    ///
    /// The row id is assigned by SQLite; the returned product is the row
    /// as persisted.
    pub async fn create(
        &self,
        code: &str,
        name: &str,
        price_cents: i64,
        initial_quantity: i64,
    ) -> DbResult<Product> {
        let now = Utc::now();

        debug!(code = %code, initial_quantity, "Creating product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (code, name, price_cents, quantity, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(price_cents)
        .bind(initial_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Gets a product by its row id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found (active or not)
    /// * `Ok(None)` - No such row
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, price_cents, quantity, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its business key (part number).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, price_cents, quantity, is_active, created_at, updated_at
            FROM products
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products sorted by code.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, price_cents, quantity, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY code
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Conditionally sets a product's quantity.
    ///
    /// The write applies only when the row is active and its quantity
    /// still equals `expected`; `rows_affected` tells the two outcomes
    /// apart. Returns `true` when the write was applied.
    pub async fn update_quantity_if(
        &self,
        id: ProductId,
        expected: i64,
        new: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = ?3, updated_at = ?4
            WHERE id = ?1 AND quantity = ?2 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let applied = result.rows_affected() == 1;
        debug!(product_id = id, expected, new, applied, "Conditional stock write");
        Ok(applied)
    }

    /// Soft-deletes a product.
    pub async fn deactivate(&self, id: ProductId) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products (active and inactive).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
