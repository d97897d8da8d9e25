//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Direct stock edits (`set_stock`)
//! - Version-guarded stock writes used by the sale engine
//!
//! ## Optimistic Versioning
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Version-Guarded Stock Write                          │
//! │                                                                         │
//! │  read:  prod-2 { stock: 5, version: 7 }                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET stock = 3, version = version + 1                  │
//! │   WHERE id = 'prod-2' AND version = 7                                  │
//! │       │                                                                 │
//! │       ├── 1 row  → our read was current, write staged                  │
//! │       └── 0 rows → someone wrote in between → TransactionConflict      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cafe_core::validation::validate_product_draft;
use cafe_core::{CoreError, Money, Product, ProductDraft};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: String,
    price_cents: i64,
    stock: i64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price_cents < 0 {
            return Err(DbError::invalid_record("Product", row.id, "negative price"));
        }
        if row.stock < 0 {
            return Err(DbError::invalid_record("Product", row.id, "negative stock"));
        }

        Ok(Product {
            id: row.id,
            name: row.name,
            category: row.category,
            price: Money::from_cents(row.price_cents),
            stock: row.stock,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Transaction-Level Helpers
// =============================================================================

/// Point read usable on a pool or inside a transaction (`&mut *tx`).
pub(crate) async fn fetch_product<'e, E>(executor: E, id: &str) -> DbResult<Option<Product>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, name, category, price_cents, stock, version, created_at, updated_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Product::try_from).transpose()
}

/// Writes `new_stock` only if the row still carries `expected_version`.
///
/// Returns `false` when no row matched.
pub(crate) async fn write_stock_if_current(
    conn: &mut SqliteConnection,
    id: &str,
    new_stock: i64,
    expected_version: i64,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = ?1, version = version + 1, updated_at = ?2
        WHERE id = ?3 AND version = ?4
        "#,
    )
    .bind(new_stock)
    .bind(now)
    .bind(id)
    .bind(expected_version)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub(crate) async fn insert_product(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, category, price_cents, stock, version, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.category)
    .bind(product.price.cents())
    .bind(product.stock)
    .bind(product.version)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let latte = db.products().get("prod-3").await?;
/// db.products().set_stock("prod-3", 40).await?;
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

    /// Lists every product, grouped by category.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price_cents, stock, version, created_at, updated_at
            FROM products
            ORDER BY category, name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        fetch_product(&self.pool, id).await
    }

    /// Gets a product by ID, failing with `NotFound` if absent.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Creates a product with a freshly generated id.
    pub async fn create(&self, draft: &ProductDraft) -> DbResult<Product> {
        validate_product_draft(draft)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            price: draft.price,
            stock: draft.stock,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        let mut conn = self.pool.acquire().await?;
        insert_product(&mut conn, &product).await?;

        Ok(product)
    }

    /// Replaces name, category, price and stock.
    pub async fn update(&self, id: &str, draft: &ProductDraft) -> DbResult<Product> {
        validate_product_draft(draft)?;

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, category = ?2, price_cents = ?3, stock = ?4,
                version = version + 1, updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(draft.name.trim())
        .bind(draft.category.trim())
        .bind(draft.price.cents())
        .bind(draft.stock)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Sets the stock level directly (inventory count, restock).
    ///
    /// ## Errors
    /// - `InvalidState` if `new_stock < 0` (checked before the store is touched)
    /// - `NotFound` if the product doesn't exist
    pub async fn set_stock(&self, id: &str, new_stock: i64) -> DbResult<Product> {
        if new_stock < 0 {
            return Err(CoreError::NegativeStock {
                product_id: id.to_string(),
                stock: new_stock,
            }
            .into());
        }

        debug!(id = %id, stock = new_stock, "Setting product stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?1, version = version + 1, updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(new_stock)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Deletes a product. Past sales keep their line items.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
