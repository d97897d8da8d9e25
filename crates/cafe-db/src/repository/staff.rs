//! # Staff Repository
//!
//! Database operations for staff members. Commission rates are stored as
//! basis points.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cafe_core::validation::validate_staff_draft;
use cafe_core::{Rate, StaffDraft, StaffMember};

#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: String,
    name: String,
    commission_bps: i64,
}

impl TryFrom<StaffRow> for StaffMember {
    type Error = DbError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let bps = u32::try_from(row.commission_bps).map_err(|_| {
            DbError::invalid_record("StaffMember", row.id.clone(), "commission out of range")
        })?;

        Ok(StaffMember {
            id: row.id,
            name: row.name,
            commission_rate: Rate::from_bps(bps),
        })
    }
}

pub(crate) async fn insert_staff(conn: &mut SqliteConnection, member: &StaffMember) -> DbResult<()> {
    sqlx::query("INSERT INTO staff (id, name, commission_bps) VALUES (?1, ?2, ?3)")
        .bind(&member.id)
        .bind(&member.name)
        .bind(i64::from(member.commission_rate.bps()))
        .execute(conn)
        .await?;

    Ok(())
}

/// Repository for staff database operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, commission_bps FROM staff ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StaffMember::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StaffMember>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, commission_bps FROM staff WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StaffMember::try_from).transpose()
    }

    pub async fn get(&self, id: &str) -> DbResult<StaffMember> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("StaffMember", id))
    }

    pub async fn create(&self, draft: &StaffDraft) -> DbResult<StaffMember> {
        validate_staff_draft(draft)?;

        let member = StaffMember {
            id: Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            commission_rate: draft.commission_rate,
        };

        debug!(id = %member.id, name = %member.name, "Creating staff member");

        let mut conn = self.pool.acquire().await?;
        insert_staff(&mut conn, &member).await?;

        Ok(member)
    }

    pub async fn update(&self, id: &str, draft: &StaffDraft) -> DbResult<StaffMember> {
        validate_staff_draft(draft)?;

        debug!(id = %id, "Updating staff member");

        let result = sqlx::query("UPDATE staff SET name = ?1, commission_bps = ?2 WHERE id = ?3")
            .bind(draft.name.trim())
            .bind(i64::from(draft.commission_rate.bps()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StaffMember", id));
        }

        self.get(id).await
    }

    /// Deletes a staff member. Their sales stay attributed to the old id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting staff member");

        let result = sqlx::query("DELETE FROM staff WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StaffMember", id));
        }

        Ok(())
    }
}
