//! # Report Services
//!
//! Compose repositories, the paginated fetch and merma-core's pure
//! aggregation into finished reports.
//!
//! - [`shortage::ShortageService`] - Faltantes per business and window
//! - [`summary::SummaryService`] - Sales per week/month, expenses per category

pub mod shortage;
pub mod summary;
