//! # Error Types
//!
//! Domain-specific error types for merma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  merma-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── DecodeError      - Store rows that cannot become typed records    │
//! │                                                                         │
//! │  merma-db errors (separate crate)                                      │
//! │  └── DbError          - Database and pagination failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CLI exit status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core reporting errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Business cannot be found.
    #[error("Business not found: {0}")]
    BusinessNotFound(String),

    /// Product cannot be found in the product master.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Report window is not one of the supported day counts.
    ///
    /// ## When This Occurs
    /// - CLI `--days 5`
    /// - Config file `default_days = 60`
    #[error("Unsupported report window: {days} days (allowed: 1, 3, 7, 14, 30)")]
    UnsupportedWindow { days: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Decoding error (wraps DecodeError).
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Decode Error
// =============================================================================

/// A raw store row that cannot be turned into a typed record.
///
/// Only identity problems are errors. Numeric fields are coerced to zero
/// by the decoder instead, so they never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The product reference is missing.
    #[error("sale item {row_id} has no product reference")]
    MissingProductId { row_id: String },

    /// The product reference is not a UUID.
    #[error("sale item {row_id} has invalid product id '{raw}'")]
    InvalidProductId { row_id: String, raw: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
