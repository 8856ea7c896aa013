//! # Shortage Report Service
//!
//! Builds the faltantes report for one business over a day window.
//!
//! ## Fan-out / Join
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  report(business_id, window, cancel)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  businesses.get_by_id ── None ──► DbError::NotFound                     │
//! │       │                                                                 │
//! │       ├──────────────────────────────┐   tokio::join!                   │
//! │       ▼                              ▼                                  │
//! │  paginate(sale items since)     paginate(inventory)                     │
//! │       │                              │                                  │
//! │       └──────────────┬───────────────┘                                  │
//! │                      ▼                                                  │
//! │  Cancelled → DbError::Cancelled   Failed → error   Partial → flagged    │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  decode_batch ──► aggregate_shortages ──► ShortageReport::build         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use merma_core::{
    aggregate_shortages, decode_batch, Category, DayWindow, ReportCompleteness, ShortageReport,
    DEFAULT_PAGE_SIZE,
};

use crate::config::ReportSettings;
use crate::error::{DbError, DbResult};
use crate::pagination::{paginate, FetchOutcome};
use crate::pool::Database;

/// Builds shortage reports.
///
/// ```rust,ignore
/// let service = ShortageService::new(db.clone()).with_page_size(500);
/// let report = service.report(&business_id, DayWindow::Week, &cancel).await?;
/// println!("{}", format_clipboard(&report, &ReportStyle::default()));
/// ```
#[derive(Debug, Clone)]
pub struct ShortageService {
    db: Database,
    page_size: u32,
    category_order: Vec<Category>,
}

impl ShortageService {
    pub fn new(db: Database) -> Self {
        ShortageService {
            db,
            page_size: DEFAULT_PAGE_SIZE,
            category_order: Vec::new(),
        }
    }

    /// Service configured from the `[report]` settings.
    pub fn from_settings(db: Database, settings: &ReportSettings) -> Self {
        ShortageService::new(db)
            .with_page_size(settings.page_size)
            .with_category_order(settings.category_order.clone())
    }

    /// Rows per page; out-of-range sizes fail at fetch time.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Categories listed first in the report.
    pub fn with_category_order(mut self, order: Vec<Category>) -> Self {
        self.category_order = order;
        self
    }

    /// Report for the window ending now.
    pub async fn report(
        &self,
        business_id: &str,
        window: DayWindow,
        cancel: &CancellationToken,
    ) -> DbResult<ShortageReport> {
        self.report_at(business_id, window, Utc::now(), cancel).await
    }

    /// Report for the window ending at `now`.
    pub async fn report_at(
        &self,
        business_id: &str,
        window: DayWindow,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> DbResult<ShortageReport> {
        let business = self
            .db
            .businesses()
            .get_by_id(business_id)
            .await?
            .ok_or_else(|| DbError::not_found("Business", business_id))?;

        let since = window.since(now);
        info!(business_id, days = window.days(), %since, "Building shortage report");

        let sales = self.db.sales();
        let inventory = self.db.inventory();
        let (sales, inventory) = (&sales, &inventory);

        let (items, levels) = tokio::join!(
            paginate(self.page_size, cancel, move |offset, limit| {
                sales.page_sale_items_since(business_id, since, offset, limit)
            }),
            paginate(self.page_size, cancel, move |offset, limit| {
                inventory.page_for_business(business_id, offset, limit)
            }),
        );

        if cancel.is_cancelled() {
            info!(business_id, "Shortage report cancelled");
            return Err(DbError::Cancelled);
        }

        let mut gaps = Vec::new();
        let items = settle(items, "sale items", &mut gaps)?;
        let levels = settle(levels, "inventory", &mut gaps)?;

        let batch = decode_batch(&items);
        if batch.rejected_count() > 0 {
            warn!(
                business_id,
                rejected = batch.rejected_count(),
                "Dropped sale items with unusable product ids"
            );
        }

        let rows = aggregate_shortages(&batch.records, &levels);
        let completeness = if gaps.is_empty() {
            ReportCompleteness::Complete
        } else {
            ReportCompleteness::Partial {
                reason: gaps.join("; "),
            }
        };

        let report = ShortageReport::build(
            business.id,
            business.name,
            window,
            now,
            rows,
            &self.category_order,
            batch.rejected_count(),
            completeness,
        );

        info!(
            business_id,
            products = report.rows().count(),
            total_units = report.total_units,
            total_cost = %report.total_cost,
            complete = report.completeness.is_complete(),
            "Shortage report ready"
        );

        Ok(report)
    }
}

/// Accepts complete or partial rows; partial ones leave a note in `gaps`.
fn settle<T>(outcome: FetchOutcome<T>, source: &str, gaps: &mut Vec<String>) -> DbResult<Vec<T>> {
    match outcome {
        FetchOutcome::Complete(rows) => Ok(rows),
        FetchOutcome::Partial { rows, error } => {
            warn!(source, rows = rows.len(), error = %error, "Using partial data");
            gaps.push(format!("{source}: {error} (after {} rows)", rows.len()));
            Ok(rows)
        }
        FetchOutcome::Failed(error) => Err(error),
        FetchOutcome::Cancelled { .. } => Err(DbError::Cancelled),
    }
}
