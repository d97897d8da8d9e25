//! # Table Repository
//!
//! Database operations for the café floor plan.
//!
//! ## Table States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   available ──── seat guests ────► occupied { current_order_id }       │
//! │       ▲                                │                                │
//! │       │                                │ sale committed                 │
//! │       └──────── release ◄──────────────┘ (status reset unconditionally) │
//! │                                                                         │
//! │   reserved  ◄─── set_status ───►  any state                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cafe_core::validation::validate_name;
use cafe_core::{CafeTable, TableStatus};

#[derive(Debug, sqlx::FromRow)]
struct TableRow {
    id: String,
    name: String,
    status: String,
    current_order_id: Option<String>,
    version: i64,
}

impl TryFrom<TableRow> for CafeTable {
    type Error = DbError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        let status: TableStatus = row.status.parse().map_err(|_| {
            DbError::invalid_record("CafeTable", row.id.clone(), format!("unknown status '{}'", row.status))
        })?;

        Ok(CafeTable {
            id: row.id,
            name: row.name,
            status,
            current_order_id: row.current_order_id,
            version: row.version,
        })
    }
}

// =============================================================================
// Transaction-Level Helpers
// =============================================================================

/// Marks a table available and clears its order reference, whatever its
/// current status. Returns `false` if the table doesn't exist.
pub(crate) async fn release_table(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE cafe_tables
        SET status = 'available', current_order_id = NULL, version = version + 1
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub(crate) async fn insert_table(conn: &mut SqliteConnection, table: &CafeTable) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cafe_tables (id, name, status, current_order_id, version)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&table.id)
    .bind(&table.name)
    .bind(table.status.as_str())
    .bind(table.current_order_id.as_deref())
    .bind(table.version)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for table database operations.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<CafeTable>> {
        let rows = sqlx::query_as::<_, TableRow>(
            "SELECT id, name, status, current_order_id, version FROM cafe_tables ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CafeTable::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CafeTable>> {
        let row = sqlx::query_as::<_, TableRow>(
            "SELECT id, name, status, current_order_id, version FROM cafe_tables WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CafeTable::try_from).transpose()
    }

    /// Gets a table by ID, failing with `NotFound` if absent.
    pub async fn get(&self, id: &str) -> DbResult<CafeTable> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("CafeTable", id))
    }

    /// Adds an available table.
    pub async fn create(&self, name: &str) -> DbResult<CafeTable> {
        validate_name("name", name)?;

        let table = CafeTable {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            status: TableStatus::Available,
            current_order_id: None,
            version: 0,
        };

        debug!(id = %table.id, name = %table.name, "Creating table");

        let mut conn = self.pool.acquire().await?;
        insert_table(&mut conn, &table).await?;

        Ok(table)
    }

    /// Renames a table.
    pub async fn update(&self, id: &str, name: &str) -> DbResult<CafeTable> {
        validate_name("name", name)?;

        let result = sqlx::query(
            "UPDATE cafe_tables SET name = ?1, version = version + 1 WHERE id = ?2",
        )
        .bind(name.trim())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CafeTable", id));
        }

        self.get(id).await
    }

    /// Sets status and order reference together.
    pub async fn set_status(
        &self,
        id: &str,
        status: TableStatus,
        order_ref: Option<&str>,
    ) -> DbResult<CafeTable> {
        debug!(id = %id, status = %status, order_ref = ?order_ref, "Setting table status");

        let result = sqlx::query(
            r#"
            UPDATE cafe_tables
            SET status = ?1, current_order_id = ?2, version = version + 1
            WHERE id = ?3
            "#,
        )
        .bind(status.as_str())
        .bind(order_ref)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CafeTable", id));
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting table");

        let result = sqlx::query("DELETE FROM cafe_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CafeTable", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{Database, DbConfig};
    use cafe_core::TableStatus;

    #[tokio::test]
    async fn test_set_status_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let table = db.tables().create("Mesa 9").await.unwrap();
        assert_eq!(table.status, TableStatus::Available);

        let occupied = db
            .tables()
            .set_status(&table.id, TableStatus::Occupied, Some("order-1"))
            .await
            .unwrap();
        assert_eq!(occupied.status, TableStatus::Occupied);
        assert_eq!(occupied.current_order_id.as_deref(), Some("order-1"));

        let reserved = db
            .tables()
            .set_status(&table.id, TableStatus::Reserved, None)
            .await
            .unwrap();
        assert_eq!(reserved.current_order_id, None);
        assert!(reserved.version > occupied.version);
    }

    #[tokio::test]
    async fn test_missing_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.tables().get("table-99").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = db
            .tables()
            .set_status("table-99", TableStatus::Occupied, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let table = db.tables().create("Mesa 9").await.unwrap();

        let renamed = db.tables().update(&table.id, "Varanda 1").await.unwrap();
        assert_eq!(renamed.name, "Varanda 1");

        db.tables().delete(&table.id).await.unwrap();
        assert!(db.tables().get_by_id(&table.id).await.unwrap().is_none());
    }
}
