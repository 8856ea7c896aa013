//! # Paginated Fetch
//!
//! Walks a table in fixed-size pages until a short page signals the end of
//! the data.
//!
//! ## Fetch Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  offset = 0                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  cancelled? ──yes──► Cancelled { rows so far }                          │
//! │     │ no                                                                │
//! │     ▼                                                                   │
//! │  fetch_page(offset, limit)  ◄── raced against the cancel token          │
//! │     │                                                                   │
//! │     ├── Err, first page ─────► Failed(error)                            │
//! │     ├── Err, later page ─────► Partial { rows so far, error }           │
//! │     ├── Ok(len < limit) ─────► Complete(rows)                           │
//! │     └── Ok(len == limit) ────► offset += limit, loop                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pages within one fetch are requested strictly one after another. There
//! is no retry; the caller decides what a partial result is worth.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use merma_core::validation::validate_page_size;

use crate::error::{DbError, DbResult};

/// Result of walking every page of a query.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Every page was fetched.
    Complete(Vec<T>),

    /// A page failed after at least one page succeeded.
    Partial { rows: Vec<T>, error: DbError },

    /// The very first page failed.
    Failed(DbError),

    /// The cancel token fired; `rows` holds what arrived before that.
    Cancelled { rows: Vec<T> },
}

impl<T> FetchOutcome<T> {
    /// True only for [`FetchOutcome::Complete`].
    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }

    /// Rows fetched so far, whatever the outcome.
    pub fn rows(&self) -> &[T] {
        match self {
            FetchOutcome::Complete(rows)
            | FetchOutcome::Partial { rows, .. }
            | FetchOutcome::Cancelled { rows } => rows,
            FetchOutcome::Failed(_) => &[],
        }
    }

    /// Keeps whatever rows arrived and drops the error.
    ///
    /// The error was already logged by [`paginate`].
    pub fn into_rows_lossy(self) -> Vec<T> {
        match self {
            FetchOutcome::Complete(rows)
            | FetchOutcome::Partial { rows, .. }
            | FetchOutcome::Cancelled { rows } => rows,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Demands the complete result set.
    ///
    /// ## Error Mapping
    /// ```text
    /// Partial   → DbError::PartialFetch { fetched, message }
    /// Failed    → the page error itself
    /// Cancelled → DbError::Cancelled
    /// ```
    pub fn into_result(self) -> DbResult<Vec<T>> {
        match self {
            FetchOutcome::Complete(rows) => Ok(rows),
            FetchOutcome::Partial { rows, error } => Err(DbError::PartialFetch {
                fetched: rows.len(),
                message: error.to_string(),
            }),
            FetchOutcome::Failed(error) => Err(error),
            FetchOutcome::Cancelled { .. } => Err(DbError::Cancelled),
        }
    }
}

/// Fetches every page of a query, `page_size` rows at a time.
///
/// `fetch_page(offset, limit)` is called with offsets `0, n, 2n, …` until it
/// returns fewer than `limit` rows. An invalid page size fails without
/// issuing any request.
///
/// ## Example
/// ```rust,ignore
/// let sales = db.sales();
/// let outcome = paginate(1000, &cancel, |offset, limit| {
///     sales.page_sales_since(&business_id, since, offset, limit)
/// })
/// .await;
/// let rows = outcome.into_result()?;
/// ```
pub async fn paginate<T, F, Fut>(
    page_size: u32,
    cancel: &CancellationToken,
    mut fetch_page: F,
) -> FetchOutcome<T>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = DbResult<Vec<T>>>,
{
    if let Err(e) = validate_page_size(page_size) {
        return FetchOutcome::Failed(e.into());
    }

    let limit = i64::from(page_size);
    let mut offset: i64 = 0;
    let mut rows: Vec<T> = Vec::new();

    loop {
        if cancel.is_cancelled() {
            debug!(offset, rows = rows.len(), "Fetch cancelled before page");
            return FetchOutcome::Cancelled { rows };
        }

        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(offset, rows = rows.len(), "Fetch cancelled during page");
                return FetchOutcome::Cancelled { rows };
            }
            page = fetch_page(offset, limit) => page,
        };

        match page {
            Ok(page) => {
                let len = page.len();
                rows.extend(page);
                debug!(offset, len, total = rows.len(), "Fetched page");

                if (len as i64) < limit {
                    return FetchOutcome::Complete(rows);
                }
                offset += limit;
            }
            Err(error) if offset == 0 => {
                warn!(error = %error, "First page failed");
                return FetchOutcome::Failed(error);
            }
            Err(error) => {
                warn!(
                    error = %error,
                    offset,
                    rows = rows.len(),
                    "Page failed, keeping rows fetched so far"
                );
                return FetchOutcome::Partial { rows, error };
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
