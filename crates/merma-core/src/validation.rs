//! # Validation Module
//!
//! Input validation for everything that is written to the store or that
//! parameterizes a report.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / config (clap, serde)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Names, identifiers, page sizes, amounts                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows read back from the store are not validated here; they go through
//! [`crate::decode`] instead.

use crate::error::ValidationError;
use crate::MAX_PAGE_SIZE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a business name (1-120 characters).
///
/// ```rust
/// use merma_core::validation::validate_business_name;
///
/// assert!(validate_business_name("Tienda La Esquina").is_ok());
/// assert!(validate_business_name("  ").is_err());
/// ```
pub fn validate_business_name(name: &str) -> ValidationResult<()> {
    validate_name("business name", name, 120)
}

/// Validates a product name (1-200 characters).
///
/// The first word decides the category, so an empty name is rejected at
/// write time even though the classifier tolerates it.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name, 200)
}

/// Validates an expense category (1-60 characters).
pub fn validate_expense_category(category: &str) -> ValidationResult<()> {
    validate_name("expense category", category, 60)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a pagination page size.
///
/// ## Rules
/// - Must be between 1 and MAX_PAGE_SIZE (1000)
pub fn validate_page_size(size: u32) -> ValidationResult<()> {
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page size".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

/// Validates a stock level (>= 0).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a sale-item quantity (>= 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates an amount in cents (>= 0).
///
/// ```rust
/// use merma_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("cost", 0).is_ok());
/// assert!(validate_amount_cents("cost", -100).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string and returns it parsed.
///
/// ```rust
/// use merma_core::validation::validate_uuid;
///
/// assert!(validate_uuid("business id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("business id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<uuid::Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_business_name("Tienda Don Pepe").is_ok());
        assert!(validate_business_name("").is_err());
        assert!(validate_business_name(&"A".repeat(121)).is_err());

        assert!(validate_product_name("Leche Alqueria 1L").is_ok());
        assert!(validate_product_name("   ").is_err());
        // Accented characters count once.
        assert!(validate_product_name(&"é".repeat(200)).is_ok());

        assert!(validate_expense_category("Servicios").is_ok());
        assert!(validate_expense_category("").is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(500).is_ok());
        assert!(validate_page_size(1000).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(1001).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_quantity(3).is_ok());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_amount_cents("amount", 10).is_ok());
    }

    #[test]
    fn test_validate_uuid() {
        let id = validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert!(matches!(
            validate_uuid("id", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_uuid("id", "123"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
