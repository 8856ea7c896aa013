//! # merma-db: Store Layer for Merma
//!
//! SQLite storage, paginated reads and the report services built on top of
//! merma-core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Merma Data Flow                                  │
//! │                                                                         │
//! │  faltantes CLI (--business, --days)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     merma-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   │   │
//! │  │   │   Services   │   │  pagination  │   │   Repositories   │   │   │
//! │  │   │ Shortage     │──►│  paginate()  │──►│ Sale, Inventory  │   │   │
//! │  │   │ Summary      │   │ FetchOutcome │   │ Business, ...    │   │   │
//! │  │   └──────┬───────┘   └──────────────┘   └────────┬─────────┘   │   │
//! │  │          │ merma-core (decode, aggregate)         │             │   │
//! │  └──────────┼────────────────────────────────────────┼─────────────┘   │
//! │             ▼                                        ▼                  │
//! │      ShortageReport                       SQLite (pool.rs, migrations) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - One repository per table
//! - [`pagination`] - Fixed-size page walker with cancellation
//! - [`service`] - Shortage and summary reports
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use merma_db::{AppConfig, Database, ShortageService};
//!
//! let config = AppConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//! let report = ShortageService::from_settings(db, &config.report)
//!     .report(&business_id, DayWindow::Week, &CancellationToken::new())
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pagination;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, DatabaseSettings, ReportSettings};
pub use error::{DbError, DbResult};
pub use pagination::{paginate, FetchOutcome};
pub use pool::{Database, DbConfig, Storage, REPORT_FAN_OUT};
pub use service::shortage::ShortageService;
pub use service::summary::SummaryService;

// Repository re-exports for convenience
pub use repository::business::BusinessRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::{SaleLine, SaleRepository};
pub use repository::shift::ShiftRepository;
