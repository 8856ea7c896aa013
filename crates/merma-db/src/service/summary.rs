//! # Summary Service
//!
//! Dashboard figures: sales per week or month and expenses per category
//! over a day window. Unlike the shortage report these totals are never
//! shown from partial data; any fetch problem is an error.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use merma_core::{
    summarize_expenses_by_category, summarize_sales, DayWindow, ExpenseBucket, Period,
    SalesBucket, DEFAULT_PAGE_SIZE,
};

use crate::error::{DbError, DbResult};
use crate::pagination::paginate;
use crate::pool::Database;

/// Builds sales and expense summaries.
#[derive(Debug, Clone)]
pub struct SummaryService {
    db: Database,
    page_size: u32,
}

impl SummaryService {
    pub fn new(db: Database) -> Self {
        SummaryService {
            db,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sales of a business bucketed by `period`, oldest bucket first.
    pub async fn sales_by_period(
        &self,
        business_id: &str,
        window: DayWindow,
        period: Period,
        cancel: &CancellationToken,
    ) -> DbResult<Vec<SalesBucket>> {
        self.sales_by_period_at(business_id, window, period, Utc::now(), cancel)
            .await
    }

    pub async fn sales_by_period_at(
        &self,
        business_id: &str,
        window: DayWindow,
        period: Period,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> DbResult<Vec<SalesBucket>> {
        self.ensure_business(business_id).await?;
        let since = window.since(now);
        let sales = self.db.sales();
        let sales = &sales;

        let rows = paginate(self.page_size, cancel, move |offset, limit| {
            sales.page_sales_since(business_id, since, offset, limit)
        })
        .await
        .into_result()?;

        info!(business_id, sales = rows.len(), ?period, "Summarized sales");
        Ok(summarize_sales(&rows, period))
    }

    /// Expenses of a business per category, largest total first.
    pub async fn expenses_by_category(
        &self,
        business_id: &str,
        window: DayWindow,
        cancel: &CancellationToken,
    ) -> DbResult<Vec<ExpenseBucket>> {
        self.ensure_business(business_id).await?;
        let since = window.since(Utc::now());
        let expenses = self.db.expenses();
        let expenses = &expenses;

        let rows = paginate(self.page_size, cancel, move |offset, limit| {
            expenses.page_since(business_id, since, offset, limit)
        })
        .await
        .into_result()?;

        info!(business_id, expenses = rows.len(), "Summarized expenses");
        Ok(summarize_expenses_by_category(&rows))
    }

    async fn ensure_business(&self, business_id: &str) -> DbResult<()> {
        match self.db.businesses().get_by_id(business_id).await? {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Business", business_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::repository::sale::SaleLine;
    use chrono::{Duration, TimeZone};
    use merma_core::Money;

    #[tokio::test]
    async fn test_sales_by_month_across_pages() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let line = [SaleLine::new("p", 1, Money::from_cents(1_000))];

        // Two in September, three in October, one outside the window.
        for days_ago in [20, 19, 10, 5, 0, 45] {
            db.sales()
                .record_sale(&business.id, None, &line, now - Duration::days(days_ago))
                .await
                .unwrap();
        }

        let buckets = SummaryService::new(db)
            .with_page_size(2)
            .sales_by_period_at(
                &business.id,
                DayWindow::Month,
                Period::Month,
                now,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2026-09");
        assert_eq!(buckets[0].sale_count, 2);
        assert_eq!(buckets[1].period, "2026-10");
        assert_eq!(buckets[1].sale_count, 3);
        assert_eq!(buckets[1].total, Money::from_cents(3_000));
    }

    #[tokio::test]
    async fn test_expenses_by_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let repo = db.expenses();
        let now = Utc::now();

        repo.create(&business.id, "Servicios", None, Money::from_cents(5_000), now)
            .await
            .unwrap();
        repo.create(&business.id, "servicios", None, Money::from_cents(2_000), now)
            .await
            .unwrap();
        repo.create(&business.id, "Transporte", None, Money::from_cents(9_000), now)
            .await
            .unwrap();

        let buckets = SummaryService::new(db)
            .expenses_by_category(&business.id, DayWindow::Week, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(buckets[0].category, "TRANSPORTE");
        assert_eq!(buckets[1].category, "SERVICIOS");
        assert_eq!(buckets[1].total, Money::from_cents(7_000));
    }

    #[tokio::test]
    async fn test_cancelled_summary_is_an_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business = db.businesses().create("Tienda").await.unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = SummaryService::new(db)
            .sales_by_period(&business.id, DayWindow::Week, Period::Week, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Cancelled));
    }

    #[tokio::test]
    async fn test_unknown_business() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = SummaryService::new(db)
            .expenses_by_category("nope", DayWindow::Week, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
