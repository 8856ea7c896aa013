//! # Shift Repository
//!
//! Work sessions of an employee at a business. Sales may reference the shift
//! they were rung up in.
//!
//! ```text
//! open() ──► Shift { closed_at: None } ──► close() ──► Shift { closed_at: Some(..) }
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use merma_core::{Shift, ValidationError};

/// Repository for shifts.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Opens a shift for an employee.
    pub async fn open(&self, business_id: &str, employee_id: &str, at: DateTime<Utc>) -> DbResult<Shift> {
        if employee_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "employee id".to_string(),
            }
            .into());
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            employee_id: employee_id.trim().to_string(),
            opened_at: at,
            closed_at: None,
        };

        debug!(id = %shift.id, business_id, employee_id, "Opening shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (id, business_id, employee_id, opened_at, closed_at)
            VALUES (?1, ?2, ?3, ?4, NULL)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.business_id)
        .bind(&shift.employee_id)
        .bind(shift.opened_at)
        .execute(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Closes an open shift.
    ///
    /// Fails with `NotFound` if the shift doesn't exist or is already closed.
    pub async fn close(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id, "Closing shift");

        let result = sqlx::query(
            r#"
            UPDATE shifts SET closed_at = ?2
            WHERE id = ?1 AND closed_at IS NULL
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open shift", id));
        }

        Ok(())
    }

    /// Gets a shift by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, business_id, employee_id, opened_at, closed_at
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::sale::SaleLine;
    use merma_core::Money;

    #[tokio::test]
    async fn test_open_and_close() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let repo = db.shifts();

        let shift = repo.open(&business.id, "emp-7", Utc::now()).await.unwrap();
        assert!(repo.get_by_id(&shift.id).await.unwrap().unwrap().is_open());

        repo.close(&shift.id, Utc::now()).await.unwrap();
        assert!(!repo.get_by_id(&shift.id).await.unwrap().unwrap().is_open());

        // Closing twice is an error.
        let err = repo.close(&shift.id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_blank_employee_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();

        let err = db.shifts().open(&business.id, " ", Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sale_references_shift() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let shift = db.shifts().open(&business.id, "emp-1", Utc::now()).await.unwrap();

        let sale = db
            .sales()
            .record_sale(
                &business.id,
                Some(&shift.id),
                &[SaleLine::new("p", 1, Money::from_cents(100))],
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(sale.shift_id.as_deref(), Some(shift.id.as_str()));
    }
}
