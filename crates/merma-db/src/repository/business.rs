//! # Business Repository
//!
//! Tenants: each business has its own inventory, sales and expenses.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use merma_core::validation::validate_business_name;
use merma_core::Business;

/// Repository for business (tenant) records.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: SqlitePool,
}

impl BusinessRepository {
    /// Creates a new BusinessRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BusinessRepository { pool }
    }

    /// Creates an active business with a fresh id.
    pub async fn create(&self, name: &str) -> DbResult<Business> {
        validate_business_name(name)?;

        let business = Business {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.insert(&business).await?;

        Ok(business)
    }

    /// Inserts a business as given.
    pub async fn insert(&self, business: &Business) -> DbResult<()> {
        debug!(id = %business.id, name = %business.name, "Inserting business");

        sqlx::query(
            r#"
            INSERT INTO businesses (id, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&business.id)
        .bind(&business.name)
        .bind(business.is_active)
        .bind(business.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a business by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Business>> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, is_active, created_at
            FROM businesses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    /// Lists active businesses by name.
    pub async fn list_active(&self) -> DbResult<Vec<Business>> {
        let businesses = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, is_active, created_at
            FROM businesses
            WHERE is_active = 1
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(businesses)
    }
}
