//! Concurrent sale finalization against a file-backed database.
//!
//! In-memory databases are pinned to one connection, so these tests use a
//! WAL database in a temporary directory with a multi-connection pool.

use cafe_core::{OrderLine, SaleRequest};
use cafe_db::{Database, DbConfig, DbError, ErrorKind};
use tempfile::TempDir;

async fn file_db(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("cafe.db")).max_connections(8);
    let db = Database::new(config).await.unwrap();
    db.seed_initial_data().await.unwrap();
    db
}

fn order(table_id: &str, product_id: &str, quantity: i64) -> SaleRequest {
    SaleRequest {
        table_id: table_id.to_string(),
        staff_id: "staff-2".to_string(),
        items: vec![OrderLine::new(product_id, quantity)],
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_sales_racing_for_the_last_units() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    db.products().set_stock("prod-2", 5).await.unwrap();

    let first = {
        let db = db.clone();
        tokio::spawn(async move { db.sale_engine().finalize_sale(&order("table-1", "prod-2", 3)).await })
    };
    let second = {
        let db = db.clone();
        tokio::spawn(async move { db.sale_engine().finalize_sale(&order("table-2", "prod-2", 3)).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];

    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1);

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(err.kind(), ErrorKind::InsufficientStock | ErrorKind::TransactionConflict),
            "unexpected error: {err}"
        );
    }

    assert_eq!(db.products().get("prod-2").await.unwrap().stock, 2);
    assert_eq!(db.sales().count().await.unwrap(), 1);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stock_never_oversold_when_callers_retry_conflicts() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    db.products().set_stock("prod-5", 10).await.unwrap();

    let mut handles = Vec::new();
    for n in 0..8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            let request = order(&format!("table-{}", n % 8 + 1), "prod-5", 2);
            for _ in 0..100 {
                match db.sale_engine().finalize_sale(&request).await {
                    Err(err) if err.is_retryable() => tokio::task::yield_now().await,
                    other => return other,
                }
            }
            Err(DbError::TransactionConflict("gave up".to_string()))
        }));
    }

    let mut committed = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(sale) => {
                assert_eq!(sale.items[0].quantity, 2);
                committed += 1;
            }
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::InsufficientStock, "unexpected error: {err}");
                sold_out += 1;
            }
        }
    }

    assert_eq!(committed, 5);
    assert_eq!(sold_out, 3);
    assert_eq!(db.products().get("prod-5").await.unwrap().stock, 0);
    assert_eq!(db.sales().count().await.unwrap(), 5);

    db.close().await;
}

#[tokio::test]
async fn closed_store_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    db.close().await;

    let err = db
        .sale_engine()
        .finalize_sale(&order("table-1", "prod-1", 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn committed_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cafe.db");

    let db = file_db(&dir).await;
    db.sale_engine()
        .finalize_sale(&order("table-3", "prod-8", 4))
        .await
        .unwrap();
    db.close().await;

    let reopened = Database::new(DbConfig::new(path)).await.unwrap();
    assert!(!reopened.seed_initial_data().await.unwrap());
    assert_eq!(reopened.products().get("prod-8").await.unwrap().stock, 26);
    assert_eq!(reopened.sales().list().await.unwrap().len(), 1);
    reopened.close().await;
}
