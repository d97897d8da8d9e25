//! # Seed Data
//!
//! Default catalog for a fresh café: menu, staff and floor plan.
//!
//! ## What Gets Created
//! ```text
//! products  prod-1 … prod-8   Bebidas Quentes, Bebidas Frias, Comidas
//! staff     staff-1 … staff-3 5% / 5% / 6% commission
//! tables    table-1 … table-8 "Mesa N"; table-3 occupied, table-6 reserved
//! ```
//!
//! Seeding runs in one transaction and leaves a `seeded` marker in
//! `metadata`, so it happens at most once per database.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::repository::product::insert_product;
use crate::repository::staff::insert_staff;
use crate::repository::table::insert_table;
use cafe_core::{CafeTable, Money, Product, Rate, StaffMember, TableStatus};

const SEED_MARKER: &str = "seeded";

/// (id, name, category, price in cents, stock)
const PRODUCTS: &[(&str, &str, &str, i64, i64)] = &[
    ("prod-1", "Espresso", "Bebidas Quentes", 500, 100),
    ("prod-2", "Cappuccino", "Bebidas Quentes", 850, 80),
    ("prod-3", "Latte", "Bebidas Quentes", 900, 75),
    ("prod-4", "Iced Coffee", "Bebidas Frias", 750, 60),
    ("prod-5", "Frappuccino", "Bebidas Frias", 1200, 50),
    ("prod-6", "Croissant", "Comidas", 600, 40),
    ("prod-7", "Pão de Queijo", "Comidas", 400, 120),
    ("prod-8", "Bolo de Cenoura", "Comidas", 800, 30),
];

/// (id, name, commission in bps)
const STAFF: &[(&str, &str, u32)] = &[
    ("staff-1", "Ana Silva", 500),
    ("staff-2", "João Santos", 500),
    ("staff-3", "Maria Oliveira", 600),
];

/// (id, name, status, current order)
const TABLES: &[(&str, &str, TableStatus, Option<&str>)] = &[
    ("table-1", "Mesa 1", TableStatus::Available, None),
    ("table-2", "Mesa 2", TableStatus::Available, None),
    ("table-3", "Mesa 3", TableStatus::Occupied, Some("temp-order-1")),
    ("table-4", "Mesa 4", TableStatus::Available, None),
    ("table-5", "Mesa 5", TableStatus::Available, None),
    ("table-6", "Mesa 6", TableStatus::Reserved, None),
    ("table-7", "Mesa 7", TableStatus::Available, None),
    ("table-8", "Mesa 8", TableStatus::Available, None),
];

/// Inserts the default catalog unless it was inserted before.
///
/// Returns `true` if data was written.
pub(crate) async fn seed_initial_data(pool: &SqlitePool) -> DbResult<bool> {
    let mut tx = pool.begin().await?;

    let already: Option<String> = sqlx::query_scalar("SELECT value FROM metadata WHERE key = ?1")
        .bind(SEED_MARKER)
        .fetch_optional(&mut *tx)
        .await?;
    if already.is_some() {
        info!("Initial data already present, skipping seed");
        return Ok(false);
    }

    let now = Utc::now();

    for &(id, name, category, cents, stock) in PRODUCTS {
        let product = Product {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_cents(cents),
            stock,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        insert_product(&mut *tx, &product).await?;
    }

    for &(id, name, bps) in STAFF {
        let member = StaffMember {
            id: id.to_string(),
            name: name.to_string(),
            commission_rate: Rate::from_bps(bps),
        };
        insert_staff(&mut *tx, &member).await?;
    }

    for &(id, name, status, order) in TABLES {
        let table = CafeTable {
            id: id.to_string(),
            name: name.to_string(),
            status,
            current_order_id: order.map(str::to_string),
            version: 0,
        };
        insert_table(&mut *tx, &table).await?;
    }

    sqlx::query("INSERT INTO metadata (key, value) VALUES (?1, ?2)")
        .bind(SEED_MARKER)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        products = PRODUCTS.len(),
        staff = STAFF.len(),
        tables = TABLES.len(),
        "Initial data seeded"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use cafe_core::{Money, TableStatus};

    #[tokio::test]
    async fn test_seed_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.seed_initial_data().await.unwrap());
        assert!(!db.seed_initial_data().await.unwrap());

        assert_eq!(db.products().count().await.unwrap(), 8);
        assert_eq!(db.staff().list().await.unwrap().len(), 3);
        assert_eq!(db.tables().list().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_seed_catalog_values() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.seed_initial_data().await.unwrap();

        let cappuccino = db.products().get("prod-2").await.unwrap();
        assert_eq!(cappuccino.price, Money::from_cents(850));
        assert_eq!(cappuccino.stock, 80);

        let maria = db.staff().get("staff-3").await.unwrap();
        assert_eq!(maria.commission_rate.bps(), 600);

        let mesa3 = db.tables().get("table-3").await.unwrap();
        assert_eq!(mesa3.status, TableStatus::Occupied);
        assert_eq!(mesa3.current_order_id.as_deref(), Some("temp-order-1"));
        assert_eq!(db.tables().get("table-6").await.unwrap().status, TableStatus::Reserved);
    }
}
