//! # Sale Engine
//!
//! Turns a [`SaleRequest`] into a committed [`Sale`]: stock is decremented,
//! the sale is recorded and the table is released, all in one SQLite
//! transaction.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       finalize_sale()                                   │
//! │                                                                         │
//! │  request.validate() ──✗──► ValidationError (store untouched)           │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  for each line, in request order:                                      │
//! │       ├── read product (sees this tx's earlier writes) ──✗──► NotFound │
//! │       ├── price_line() ──✗──► InsufficientStock                        │
//! │       └── UPDATE … WHERE version = read_version ──0 rows──► Conflict   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sale + items (created_at = now, after all reads)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  release table (unconditional) ──✗──► NotFound                         │
//! │       │                                                                 │
//! │       ▼  COMMIT ──busy/locked──► TransactionConflict                    │
//! │                                                                         │
//! │  Any early return drops the transaction, which rolls it back.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conflicts are reported, never retried here. [`DbError::is_retryable`]
//! tells the caller whether sending the same request again makes sense.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::{fetch_product, write_stock_if_current};
use crate::repository::sale::insert_sale;
use crate::repository::table::release_table;
use cafe_core::order::{order_total, price_line};
use cafe_core::{Sale, SaleRequest};

/// Executes sale finalization against the store.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: SqlitePool,
}

impl SaleEngine {
    pub fn new(pool: SqlitePool) -> Self {
        SaleEngine { pool }
    }

    /// Finalizes a sale atomically.
    ///
    /// ## Errors
    /// - `Validation` - malformed request, nothing was read
    /// - `NotFound` - unknown product or table
    /// - `InsufficientStock` - names the product, with available and requested
    /// - `TransactionConflict` - a concurrent writer got there first
    /// - `StoreUnavailable` - the pool is closed or unreachable
    ///
    /// On any error the store is left exactly as it was.
    pub async fn finalize_sale(&self, request: &SaleRequest) -> DbResult<Sale> {
        request.validate()?;

        debug!(
            table_id = %request.table_id,
            staff_id = %request.staff_id,
            lines = request.items.len(),
            "Finalizing sale"
        );

        match self.commit_sale(request).await {
            Ok(sale) => {
                info!(
                    sale_id = %sale.id,
                    table_id = %sale.table_id,
                    total = %sale.total,
                    units = sale.units(),
                    "Sale committed"
                );
                Ok(sale)
            }
            Err(err) => {
                warn!(
                    table_id = %request.table_id,
                    kind = ?err.kind(),
                    error = %err,
                    "Sale aborted"
                );
                Err(err)
            }
        }
    }

    async fn commit_sale(&self, request: &SaleRequest) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;
        let mut items = Vec::with_capacity(request.items.len());

        for line in &request.items {
            let product = fetch_product(&mut *tx, &line.product_id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", &line.product_id))?;

            let (item, new_stock) = price_line(&product, line.quantity)?;

            let written =
                write_stock_if_current(&mut *tx, &product.id, new_stock, product.version, Utc::now())
                    .await?;
            if !written {
                return Err(DbError::TransactionConflict(format!(
                    "product {} changed during the sale",
                    product.id
                )));
            }

            debug!(
                product_id = %product.id,
                stock = product.stock,
                new_stock,
                "Stock decrement staged"
            );
            items.push(item);
        }

        let total = order_total(&items)?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            table_id: request.table_id.clone(),
            staff_id: request.staff_id.clone(),
            items,
            total,
            created_at: Utc::now(),
        };

        insert_sale(&mut *tx, &sale).await?;

        if !release_table(&mut *tx, &request.table_id).await? {
            return Err(DbError::not_found("CafeTable", &request.table_id));
        }

        tx.commit().await?;

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{Database, DbConfig};
    use cafe_core::{Money, OrderLine, SaleRequest, TableStatus};

    /// Seeded database: prod-2 Cappuccino 8.50, prod-7 Pão de Queijo 4.00,
    /// table-3 occupied with temp-order-1.
    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.seed_initial_data().await.unwrap());
        db
    }

    fn request(table_id: &str, lines: &[(&str, i64)]) -> SaleRequest {
        SaleRequest {
            table_id: table_id.to_string(),
            staff_id: "staff-1".to_string(),
            items: lines
                .iter()
                .map(|(product_id, quantity)| OrderLine::new(*product_id, *quantity))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_exact_stock_sells_out() {
        let db = seeded().await;
        db.products().set_stock("prod-2", 5).await.unwrap();

        let sale = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-2", 5)]))
            .await
            .unwrap();

        assert_eq!(sale.total, Money::from_cents(4_250));
        assert_eq!(db.products().get("prod-2").await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = seeded().await;
        db.products().set_stock("prod-2", 5).await.unwrap();
        let table_before = db.tables().get("table-3").await.unwrap();

        let err = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-7", 1), ("prod-2", 6)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert!(err.to_string().contains("Cappuccino"));
        assert_eq!(db.products().get("prod-2").await.unwrap().stock, 5);
        assert_eq!(db.products().get("prod-7").await.unwrap().stock, 120);
        assert_eq!(db.tables().get("table-3").await.unwrap(), table_before);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_total_and_price_snapshot() {
        let db = seeded().await;

        let sale = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-2", 2), ("prod-7", 3)]))
            .await
            .unwrap();

        assert_eq!(sale.total, Money::from_cents(2_900));
        assert_eq!(sale.items[0].price_at_sale, Money::from_cents(850));
        assert_eq!(sale.items[1].price_at_sale, Money::from_cents(400));

        // A later price edit leaves the recorded sale alone
        let mut cappuccino = db.products().get("prod-2").await.unwrap();
        cappuccino.price = Money::from_cents(990);
        let draft = cafe_core::ProductDraft {
            name: cappuccino.name,
            category: cappuccino.category,
            price: cappuccino.price,
            stock: cappuccino.stock,
        };
        db.products().update("prod-2", &draft).await.unwrap();

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].price_at_sale, Money::from_cents(850));
        assert_eq!(stored.total, Money::from_cents(2_900));
    }

    #[tokio::test]
    async fn test_unknown_product_changes_nothing() {
        let db = seeded().await;

        let err = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-2", 1), ("prod-404", 1)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(db.products().get("prod-2").await.unwrap().stock, 80);
        let table = db.tables().get("table-3").await.unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id.as_deref(), Some("temp-order-1"));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_table_rolls_back_stock() {
        let db = seeded().await;

        let err = db
            .sale_engine()
            .finalize_sale(&request("table-99", &[("prod-2", 1)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(db.products().get("prod-2").await.unwrap().stock, 80);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_table_released_whatever_its_status() {
        let db = seeded().await;

        db.sale_engine()
            .finalize_sale(&request("table-3", &[("prod-1", 1)]))
            .await
            .unwrap();
        let released = db.tables().get("table-3").await.unwrap();
        assert_eq!(released.status, TableStatus::Available);
        assert_eq!(released.current_order_id, None);

        // table-6 is reserved, not occupied; it is reset all the same
        db.sale_engine()
            .finalize_sale(&request("table-6", &[("prod-1", 1)]))
            .await
            .unwrap();
        assert_eq!(db.tables().get("table-6").await.unwrap().status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_repeated_lines_are_cumulative() {
        let db = seeded().await;
        db.products().set_stock("prod-3", 5).await.unwrap();

        let err = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-3", 3), ("prod-3", 3)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DbError::Domain(cafe_core::CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(db.products().get("prod-3").await.unwrap().stock, 5);

        let sale = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-3", 2), ("prod-3", 3)]))
            .await
            .unwrap();
        assert_eq!(sale.items.len(), 2);
        assert_eq!(db.products().get("prod-3").await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_store_access() {
        let db = seeded().await;
        db.close().await;

        // Pool is closed; validation still answers first
        let err = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-2", 0)]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = db
            .sale_engine()
            .finalize_sale(&request("table-3", &[("prod-2", 1)]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn test_sale_recorded_for_reports() {
        let db = seeded().await;

        let sale = db
            .sale_engine()
            .finalize_sale(&request("table-1", &[("prod-1", 2), ("prod-3", 1)]))
            .await
            .unwrap();

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, sale.id);
        assert_eq!(sales[0].items, sale.items);
        assert_eq!(sales[0].total, Money::from_cents(1_900));

        let rows = cafe_core::reports::sales_report(
            &sales,
            &db.products().list().await.unwrap(),
            &db.staff().list().await.unwrap(),
        );
        assert_eq!(rows[0].staff_name, "Ana Silva");
        assert_eq!(rows[0].items, "2x Espresso, 1x Latte");
    }
}
