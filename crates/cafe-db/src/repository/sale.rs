//! # Sale Repository
//!
//! Storage for committed sales and their line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. FINALIZE (SaleEngine, one transaction)                             │
//! │     └── insert_sale() → sales row + sale_items rows (by position)      │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list() / get_by_id() → Sale with items in request order        │
//! │                                                                         │
//! │  Sales are never updated or deleted.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DbError, DbResult};
use cafe_core::{Money, OrderItem, Sale};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    table_id: String,
    staff_id: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    sale_id: String,
    product_id: String,
    quantity: i64,
    price_at_sale_cents: i64,
}

impl TryFrom<SaleItemRow> for OrderItem {
    type Error = DbError;

    fn try_from(row: SaleItemRow) -> Result<Self, Self::Error> {
        if row.quantity <= 0 || row.price_at_sale_cents < 0 {
            return Err(DbError::invalid_record(
                "SaleItem",
                row.sale_id,
                "non-positive quantity or negative price",
            ));
        }

        Ok(OrderItem {
            product_id: row.product_id,
            quantity: row.quantity,
            price_at_sale: Money::from_cents(row.price_at_sale_cents),
        })
    }
}

fn assemble(row: SaleRow, items: Vec<OrderItem>) -> Sale {
    Sale {
        id: row.id,
        table_id: row.table_id,
        staff_id: row.staff_id,
        items,
        total: Money::from_cents(row.total_cents),
        created_at: row.created_at,
    }
}

/// Stages a sale and its items on the given connection (normally a
/// transaction).
pub(crate) async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (id, table_id, staff_id, total_cents, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.table_id)
    .bind(&sale.staff_id)
    .bind(sale.total.cents())
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await?;

    for (position, item) in sale.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_items (sale_id, position, product_id, quantity, price_at_sale_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.price_at_sale.cents())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Read side of sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// All sales, newest first, each with its items.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, table_id, staff_id, total_cents, created_at
            FROM sales
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT sale_id, product_id, quantity, price_at_sale_cents
            FROM sale_items
            ORDER BY sale_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            let sale_id = row.sale_id.clone();
            items_by_sale
                .entry(sale_id)
                .or_default()
                .push(OrderItem::try_from(row)?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                assemble(row, items)
            })
            .collect())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let Some(row) = sqlx::query_as::<_, SaleRow>(
            "SELECT id, table_id, staff_id, total_cents, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT sale_id, product_id, quantity, price_at_sale_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(OrderItem::try_from)
        .collect::<DbResult<Vec<_>>>()?;

        Ok(Some(assemble(row, items)))
    }

    /// Counts committed sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{Duration, TimeZone};

    fn sale(id: &str, minutes: i64, items: Vec<OrderItem>) -> Sale {
        let total = cafe_core::order::order_total(&items).unwrap();
        Sale {
            id: id.to_string(),
            table_id: "table-1".to_string(),
            staff_id: "staff-1".to_string(),
            items,
            total,
            created_at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn item(product_id: &str, quantity: i64, cents: i64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            quantity,
            price_at_sale: Money::from_cents(cents),
        }
    }

    #[tokio::test]
    async fn test_list_newest_first_with_items_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let older = sale("sale-a", 0, vec![item("prod-2", 2, 850), item("prod-7", 3, 400)]);
        let newer = sale("sale-b", 30, vec![item("prod-1", 1, 500)]);
        insert_sale(&mut conn, &older).await.unwrap();
        insert_sale(&mut conn, &newer).await.unwrap();
        drop(conn);

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, "sale-b");
        assert_eq!(sales[1].items, older.items);
        assert_eq!(sales[1].total, Money::from_cents(2_900));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let recorded = sale("sale-a", 0, vec![item("prod-3", 1, 900)]);
        insert_sale(&mut conn, &recorded).await.unwrap();
        drop(conn);

        let fetched = db.sales().get_by_id("sale-a").await.unwrap().unwrap();
        assert_eq!(fetched, recorded);
        assert!(db.sales().get_by_id("sale-z").await.unwrap().is_none());
    }
}
