//! # merma-core: Pure Reporting Logic
//!
//! Shrinkage ("faltantes") and replenishment reporting for multi-tenant
//! retail back-offices, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Merma Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              faltantes CLI / admin dashboard                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               merma-db (store, pagination, services)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw rows                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ merma-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   decode ──► shortage ──► category groups ──► report (text)    │   │
//! │  │   money     types     validation     summary                   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored entities and the report day window
//! - [`money`] - Integer-cents money and locale formatting
//! - [`category`] - Product name → category classifier
//! - [`decode`] - Raw store rows → typed sale-item records
//! - [`shortage`] - Shortage aggregation and category grouping
//! - [`report`] - Clipboard text formatter
//! - [`summary`] - Sales per week/month, expenses per category
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use merma_core::category::{classify, Category};
//! use merma_core::money::Money;
//!
//! assert_eq!(classify("Leche entera 1L"), Category::Leche);
//! assert_eq!(Money::parse_decimal("abc"), None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod decode;
pub mod error;
pub mod money;
pub mod report;
pub mod shortage;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use category::{classify, Category};
pub use decode::{decode_batch, decode_sale_item, DecodedBatch, RawSaleItemRow, SaleItemRecord};
pub use error::{CoreError, CoreResult, DecodeError, ValidationError};
pub use money::{Locale, Money};
pub use report::{format_clipboard, ReportStyle};
pub use shortage::{
    aggregate_shortages, group_by_category, CategoryGroup, ReportCompleteness, ShortageReport,
    ShortageRow,
};
pub use summary::{summarize_expenses_by_category, summarize_sales, ExpenseBucket, Period, SalesBucket};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest page the store is ever asked for.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used when configuration does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
