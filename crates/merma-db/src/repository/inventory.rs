//! # Inventory Repository
//!
//! Current stock per (business, product). The shortage report reads it as a
//! snapshot; it is never modified by reporting.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use merma_core::validation::validate_stock;
use merma_core::InventoryLevel;

/// Repository for `business_inventory`.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Sets the stock of a product at a business, creating the row if needed.
    pub async fn set_stock(&self, business_id: &str, product_id: &str, stock: i64) -> DbResult<()> {
        validate_stock(stock)?;

        debug!(business_id, product_id, stock, "Setting stock");

        sqlx::query(
            r#"
            INSERT INTO business_inventory (business_id, product_id, stock, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (business_id, product_id)
            DO UPDATE SET stock = excluded.stock, updated_at = excluded.updated_at
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .bind(stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stock of one product, `None` if the business never stocked it.
    pub async fn get_stock(&self, business_id: &str, product_id: &str) -> DbResult<Option<i64>> {
        let stock: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT stock FROM business_inventory
            WHERE business_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    /// One page of a business's stock levels, in a stable order.
    pub async fn page_for_business(
        &self,
        business_id: &str,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<InventoryLevel>> {
        let levels = sqlx::query_as::<_, InventoryLevel>(
            r#"
            SELECT product_id, business_id, stock
            FROM business_inventory
            WHERE business_id = ?1
            ORDER BY product_id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use merma_core::Money;

    #[tokio::test]
    async fn test_set_stock_upserts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let product = db
            .products()
            .create("Cafe Sello Rojo", Money::from_cents(900))
            .await
            .unwrap();
        let repo = db.inventory();

        repo.set_stock(&business.id, &product.id, 12).await.unwrap();
        repo.set_stock(&business.id, &product.id, 4).await.unwrap();

        assert_eq!(repo.get_stock(&business.id, &product.id).await.unwrap(), Some(4));
        assert_eq!(repo.get_stock(&business.id, "other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.inventory().set_stock("b", "p", -1).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_pages_are_scoped_to_business() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mine = db.businesses().create("Mia").await.unwrap();
        let theirs = db.businesses().create("Otra").await.unwrap();
        let repo = db.inventory();

        for i in 0..5 {
            let product = db
                .products()
                .create(&format!("Galletas {i}"), Money::from_cents(100))
                .await
                .unwrap();
            repo.set_stock(&mine.id, &product.id, i).await.unwrap();
            repo.set_stock(&theirs.id, &product.id, 100).await.unwrap();
        }

        let first = repo.page_for_business(&mine.id, 0, 3).await.unwrap();
        let second = repo.page_for_business(&mine.id, 3, 3).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert!(first.iter().chain(&second).all(|l| l.business_id == mine.id));
        assert!(first.iter().all(|a| second.iter().all(|b| a.product_id != b.product_id)));
    }
}
