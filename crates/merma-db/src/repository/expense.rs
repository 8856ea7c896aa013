//! # Expense Repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use merma_core::validation::{validate_amount_cents, validate_expense_category};
use merma_core::{Expense, Money};

/// Repository for business expenses.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records an expense with a fresh id.
    pub async fn create(
        &self,
        business_id: &str,
        category: &str,
        description: Option<&str>,
        amount: Money,
        at: DateTime<Utc>,
    ) -> DbResult<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            category: category.trim().to_string(),
            description: description.map(str::to_string),
            amount_cents: amount.cents(),
            created_at: at,
        };
        self.insert(&expense).await?;

        Ok(expense)
    }

    /// Inserts an expense as given.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        validate_expense_category(&expense.category)?;
        validate_amount_cents("expense amount", expense.amount_cents)?;

        debug!(id = %expense.id, business_id = %expense.business_id, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, business_id, category, description, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.business_id)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// One page of a business's expenses at or after `since`, oldest first.
    pub async fn page_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, business_id, category, description, amount_cents, created_at
            FROM expenses
            WHERE business_id = ?1 AND created_at >= ?2
            ORDER BY created_at, id
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(business_id)
        .bind(since)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_and_page() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let repo = db.expenses();
        let now = Utc::now();

        repo.create(&business.id, "Arriendo", None, Money::from_cents(90_000), now - Duration::days(40))
            .await
            .unwrap();
        repo.create(
            &business.id,
            " Servicios ",
            Some("Luz octubre"),
            Money::from_cents(12_000),
            now - Duration::days(1),
        )
        .await
        .unwrap();

        let page = repo
            .page_since(&business.id, now - Duration::days(30), 0, 10)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].category, "Servicios");
        assert_eq!(page[0].description.as_deref(), Some("Luz octubre"));
        assert_eq!(page[0].amount(), Money::from_cents(12_000));
    }

    #[tokio::test]
    async fn test_invalid_expense_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let repo = db.expenses();

        let err = repo
            .create(&business.id, "", None, Money::from_cents(1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo
            .create(&business.id, "Otros", None, Money::from_cents(-1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
