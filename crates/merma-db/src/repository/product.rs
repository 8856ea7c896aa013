//! # Product Repository
//!
//! The product master: canonical name and purchase cost of every product,
//! shared by all businesses.
//!
//! `purchase_cost` is stored as decimal text (`"2500.50"`). Imported
//! catalogs may hold anything in that column, so reads are lenient: a value
//! that doesn't parse is read back as zero.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DbResult;
use merma_core::validation::{validate_amount_cents, validate_product_name};
use merma_core::{Money, ProductMaster};

/// Row shape of `products_master` before the cost text is parsed.
#[derive(Debug, sqlx::FromRow)]
struct ProductMasterRow {
    id: String,
    name: String,
    purchase_cost: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductMasterRow> for ProductMaster {
    fn from(row: ProductMasterRow) -> Self {
        let purchase_cost = match row.purchase_cost.as_deref().and_then(Money::parse_decimal) {
            Some(cost) if !cost.is_negative() => cost,
            _ => {
                warn!(
                    id = %row.id,
                    raw = ?row.purchase_cost,
                    "Unreadable purchase cost, using zero"
                );
                Money::zero()
            }
        };

        ProductMaster {
            id: row.id,
            name: row.name,
            purchase_cost,
            created_at: row.created_at,
        }
    }
}

/// Repository for the product master.
///
/// ## Usage
/// ```rust,ignore
/// let leche = db.products().create("Leche entera 1L", Money::from_cents(4_200)).await?;
/// let count = db.products().count().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with a fresh id.
    pub async fn create(&self, name: &str, purchase_cost: Money) -> DbResult<ProductMaster> {
        let product = ProductMaster {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            purchase_cost,
            created_at: Utc::now(),
        };
        self.insert(&product).await?;

        Ok(product)
    }

    /// Inserts a product.
    ///
    /// Name and cost are validated; rows written through here always read
    /// back exactly.
    pub async fn insert(&self, product: &ProductMaster) -> DbResult<()> {
        validate_product_name(&product.name)?;
        validate_amount_cents("purchase cost", product.purchase_cost.cents())?;

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products_master (id, name, purchase_cost, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.purchase_cost.to_decimal_string())
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductMaster>> {
        let row = sqlx::query_as::<_, ProductMasterRow>(
            r#"
            SELECT id, name, CAST(purchase_cost AS TEXT) AS purchase_cost, created_at
            FROM products_master
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductMaster::from))
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products_master")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
