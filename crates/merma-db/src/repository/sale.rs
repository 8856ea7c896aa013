//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Reads for Reporting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──┐                                                              │
//! │          │ s.business_id = ? AND s.created_at >= since                  │
//! │          ▼                                                              │
//! │  sale_items ──LEFT JOIN── products_master                               │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  RawSaleItemRow { product_id_raw, quantity_raw, unit_cost_raw, name }   │
//! │  (every loose column CAST to TEXT; decoding happens in merma-core)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use merma_core::validation::{validate_amount_cents, validate_quantity};
use merma_core::{Money, RawSaleItemRow, Sale, SaleItem};

/// One line of a sale being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        SaleLine {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header as given.
    pub async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        validate_amount_cents("sale total", sale.total_cents)?;

        debug!(id = %sale.id, business_id = %sale.business_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, business_id, shift_id, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.business_id)
        .bind(&sale.shift_id)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Adds an item to an existing sale.
    ///
    /// The sale total is not touched; use [`SaleRepository::record_sale`] to
    /// write a sale and its items together.
    pub async fn add_item(&self, item: &SaleItem) -> DbResult<()> {
        validate_quantity(item.quantity)?;
        validate_amount_cents("unit price", item.unit_price_cents)?;

        debug!(sale_id = %item.sale_id, product_id = %item.product_id, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records a sale and its items in one transaction.
    ///
    /// The total is the sum of `unit_price × quantity` over the lines.
    pub async fn record_sale(
        &self,
        business_id: &str,
        shift_id: Option<&str>,
        lines: &[SaleLine],
        at: DateTime<Utc>,
    ) -> DbResult<Sale> {
        for line in lines {
            validate_quantity(line.quantity)?;
            validate_amount_cents("unit price", line.unit_price.cents())?;
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            shift_id: shift_id.map(str::to_string),
            total_cents: lines.iter().map(SaleLine::line_total).sum::<Money>().cents(),
            created_at: at,
        };

        debug!(id = %sale.id, business_id, lines = lines.len(), "Recording sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, business_id, shift_id, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.business_id)
        .bind(&sale.shift_id)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(sale)
    }

    /// Items of a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// One page of a business's sales made at or after `since`, oldest first.
    pub async fn page_sales_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, business_id, shift_id, total_cents, created_at
            FROM sales
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

        Ok(sales)
    }

    /// One page of sale items sold by a business at or after `since`, with
    /// the product master columns embedded as raw text.
    ///
    /// Items whose product is missing from the catalog come back with no
    /// name and no cost.
    pub async fn page_sale_items_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<RawSaleItemRow>> {
        let rows = sqlx::query_as::<_, RawSaleItemRow>(
            r#"
            SELECT
                si.id AS id,
                CAST(si.product_id AS TEXT) AS product_id_raw,
                CAST(si.quantity AS TEXT) AS quantity_raw,
                CAST(pm.purchase_cost AS TEXT) AS unit_cost_raw,
                pm.name AS product_name
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            LEFT JOIN products_master pm ON pm.id = si.product_id
            WHERE s.business_id = ?1 AND s.created_at >= ?2
            ORDER BY s.created_at, si.id
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(business_id)
        .bind(since)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(business_id, offset, rows = rows.len(), "Fetched sale item page");

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn setup() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let product = db
            .products()
            .create("Leche Alqueria 1L", Money::from_cents(3_800))
            .await
            .unwrap();
        (db, business.id, product.id)
    }

    #[tokio::test]
    async fn test_record_sale_computes_total() {
        let (db, business_id, product_id) = setup().await;
        let repo = db.sales();

        let sale = repo
            .record_sale(
                &business_id,
                None,
                &[
                    SaleLine::new(&product_id, 2, Money::from_cents(4_500)),
                    SaleLine::new(&product_id, 1, Money::from_cents(1_000)),
                ],
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(sale.total_cents, 10_000);
        assert_eq!(repo.get_items(&sale.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_sale() {
        let (db, _, product_id) = setup().await;

        // Unknown business: the header violates its foreign key.
        let err = db
            .sales()
            .record_sale(
                "no-such-business",
                None,
                &[SaleLine::new(&product_id, 1, Money::from_cents(100))],
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_insert_sale_and_add_item() {
        let (db, business_id, product_id) = setup().await;
        let repo = db.sales();

        let sale = Sale {
            id: "sale-1".to_string(),
            business_id: business_id.clone(),
            shift_id: None,
            total_cents: 7_600,
            created_at: Utc::now(),
        };
        repo.insert_sale(&sale).await.unwrap();
        repo.add_item(&SaleItem {
            id: "item-1".to_string(),
            sale_id: sale.id.clone(),
            product_id: product_id.clone(),
            quantity: 2,
            unit_price_cents: 3_800,
        })
        .await
        .unwrap();

        let err = repo
            .add_item(&SaleItem {
                id: "item-2".to_string(),
                sale_id: sale.id.clone(),
                product_id,
                quantity: -1,
                unit_price_cents: 3_800,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(repo.get_items("sale-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_window_filters_old_sales() {
        let (db, business_id, product_id) = setup().await;
        let repo = db.sales();
        let now = Utc::now();
        let line = [SaleLine::new(&product_id, 1, Money::from_cents(4_000))];

        repo.record_sale(&business_id, None, &line, now - Duration::days(10))
            .await
            .unwrap();
        repo.record_sale(&business_id, None, &line, now - Duration::days(2))
            .await
            .unwrap();

        let since = now - Duration::days(7);
        let sales = repo.page_sales_since(&business_id, since, 0, 100).await.unwrap();
        assert_eq!(sales.len(), 1);

        let items = repo
            .page_sale_items_since(&business_id, since, 0, 100)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id_raw.as_deref(), Some(product_id.as_str()));
        assert_eq!(items[0].quantity_raw.as_deref(), Some("1"));
        assert_eq!(items[0].unit_cost_raw.as_deref(), Some("38.00"));
        assert_eq!(items[0].product_name.as_deref(), Some("Leche Alqueria 1L"));
    }

    #[tokio::test]
    async fn test_unknown_product_has_no_master_columns() {
        let (db, business_id, _) = setup().await;

        db.sales()
            .record_sale(
                &business_id,
                None,
                &[SaleLine::new("not-in-catalog", 3, Money::from_cents(500))],
                Utc::now(),
            )
            .await
            .unwrap();

        let items = db
            .sales()
            .page_sale_items_since(&business_id, Utc::now() - Duration::days(1), 0, 10)
            .await
            .unwrap();
        assert_eq!(items[0].product_id_raw.as_deref(), Some("not-in-catalog"));
        assert_eq!(items[0].product_name, None);
        assert_eq!(items[0].unit_cost_raw, None);
    }
}
