//! # Record Decoding
//!
//! The single place where loosely-typed store rows become typed records.
//!
//! ## Coercion Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field          Raw value            Decoded                            │
//! │  ─────────────  ───────────────────  ─────────────────────────────────  │
//! │  product id     "6f1c…" (UUID)       Uuid                               │
//! │                 "", "abc", NULL      DecodeError (row dropped)          │
//! │  quantity       "5"                  5                                  │
//! │                 "-2", "x", NULL      0                                  │
//! │  unit cost      "2500.50"            Money(250050)                      │
//! │                 "-1", "abc", NULL    Money(0)                           │
//! │  product name   "Leche"              "Leche"                            │
//! │                 NULL, "  "           product id as text                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numbers are coerced rather than rejected so that a single bad catalog
//! entry never hides the rest of a shortage report. Identity is not coerced:
//! a row that cannot be attributed to a product is dropped and counted.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::DecodeError;
use crate::money::Money;

// =============================================================================
// Raw Row
// =============================================================================

/// A sale-item row exactly as the store returns it, with the product master
/// columns embedded and every loosely-typed column read as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RawSaleItemRow {
    /// Sale item identifier, used only in diagnostics.
    pub id: String,
    pub product_id_raw: Option<String>,
    pub quantity_raw: Option<String>,
    pub unit_cost_raw: Option<String>,
    pub product_name: Option<String>,
}

// =============================================================================
// Typed Record
// =============================================================================

/// A decoded sale item. `quantity >= 0` and `unit_cost >= 0` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemRecord {
    pub quantity: i64,
    pub product_id: Uuid,
    pub unit_cost: Money,
    pub product_name: String,
}

impl SaleItemRecord {
    /// Builds a record from already-typed values, clamping negatives to zero.
    pub fn new(
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: i64,
        unit_cost: Money,
    ) -> Self {
        SaleItemRecord {
            quantity: quantity.max(0),
            product_id,
            unit_cost: if unit_cost.is_negative() {
                Money::zero()
            } else {
                unit_cost
            },
            product_name: product_name.into(),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes one raw row.
///
/// ```rust
/// use merma_core::decode::{decode_sale_item, RawSaleItemRow};
///
/// let raw = RawSaleItemRow {
///     id: "1".into(),
///     product_id_raw: Some("6f1c0a54-0c0e-4a8e-9b0a-2a3f4e5d6c7b".into()),
///     quantity_raw: Some("3".into()),
///     unit_cost_raw: Some("abc".into()),
///     product_name: Some("Arroz Diana".into()),
/// };
/// let record = decode_sale_item(&raw).unwrap();
/// assert_eq!(record.quantity, 3);
/// assert!(record.unit_cost.is_zero());
/// ```
pub fn decode_sale_item(raw: &RawSaleItemRow) -> Result<SaleItemRecord, DecodeError> {
    let product_ref = raw
        .product_id_raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DecodeError::MissingProductId {
            row_id: raw.id.clone(),
        })?;

    let product_id = Uuid::parse_str(product_ref).map_err(|_| DecodeError::InvalidProductId {
        row_id: raw.id.clone(),
        raw: product_ref.to_string(),
    })?;

    let quantity = match raw.quantity_raw.as_deref().and_then(lenient_quantity) {
        Some(q) => q,
        None => {
            debug!(row_id = %raw.id, raw = ?raw.quantity_raw, "quantity coerced to 0");
            0
        }
    };

    let unit_cost = match raw.unit_cost_raw.as_deref().and_then(Money::parse_decimal) {
        Some(cost) if !cost.is_negative() => cost,
        _ => {
            debug!(row_id = %raw.id, raw = ?raw.unit_cost_raw, "unit cost coerced to 0");
            Money::zero()
        }
    };

    let product_name = raw
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| product_id.to_string(), str::to_string);

    Ok(SaleItemRecord {
        quantity,
        product_id,
        unit_cost,
        product_name,
    })
}

/// Integer quantity; a decimal with a zero fraction (`"2.0"`) is accepted
/// because some stores serialize integers that way.
fn lenient_quantity(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let parsed = match raw.parse::<i64>() {
        Ok(q) => q,
        Err(_) => {
            let (int_part, frac) = raw.split_once('.')?;
            if !frac.chars().all(|c| c == '0') {
                return None;
            }
            int_part.parse::<i64>().ok()?
        }
    };
    (parsed >= 0).then_some(parsed)
}

/// Result of decoding a batch: the usable records plus what was dropped.
#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    pub records: Vec<SaleItemRecord>,
    pub rejected: Vec<DecodeError>,
}

impl DecodedBatch {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Decodes every row, keeping the failures instead of stopping at the first.
pub fn decode_batch<'a, I>(rows: I) -> DecodedBatch
where
    I: IntoIterator<Item = &'a RawSaleItemRow>,
{
    let mut batch = DecodedBatch::default();
    for raw in rows {
        match decode_sale_item(raw) {
            Ok(record) => batch.records.push(record),
            Err(err) => batch.rejected.push(err),
        }
    }
    batch
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT: &str = "6f1c0a54-0c0e-4a8e-9b0a-2a3f4e5d6c7b";

    fn raw(product: Option<&str>, qty: Option<&str>, cost: Option<&str>, name: Option<&str>) -> RawSaleItemRow {
        RawSaleItemRow {
            id: "row-1".to_string(),
            product_id_raw: product.map(str::to_string),
            quantity_raw: qty.map(str::to_string),
            unit_cost_raw: cost.map(str::to_string),
            product_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_decode_clean_row() {
        let record = decode_sale_item(&raw(Some(PRODUCT), Some("4"), Some("2500.5"), Some("Leche")))
            .unwrap();
        assert_eq!(record.product_id.to_string(), PRODUCT);
        assert_eq!(record.quantity, 4);
        assert_eq!(record.unit_cost, Money::from_cents(250_050));
        assert_eq!(record.product_name, "Leche");
    }

    #[test]
    fn test_malformed_cost_becomes_zero() {
        let record = decode_sale_item(&raw(Some(PRODUCT), Some("2"), Some("abc"), Some("Sal"))).unwrap();
        assert_eq!(record.quantity, 2);
        assert!(record.unit_cost.is_zero());

        let record = decode_sale_item(&raw(Some(PRODUCT), Some("2"), Some("-10"), Some("Sal"))).unwrap();
        assert!(record.unit_cost.is_zero());

        let record = decode_sale_item(&raw(Some(PRODUCT), Some("2"), None, Some("Sal"))).unwrap();
        assert!(record.unit_cost.is_zero());
    }

    #[test]
    fn test_malformed_quantity_becomes_zero() {
        for qty in [Some("x"), Some("-3"), Some("1.5"), None] {
            let record = decode_sale_item(&raw(Some(PRODUCT), qty, Some("1"), Some("Sal"))).unwrap();
            assert_eq!(record.quantity, 0, "quantity {qty:?}");
        }
        let record = decode_sale_item(&raw(Some(PRODUCT), Some("7.00"), Some("1"), None)).unwrap();
        assert_eq!(record.quantity, 7);
    }

    #[test]
    fn test_invalid_product_id_is_an_error() {
        assert_eq!(
            decode_sale_item(&raw(Some("123"), Some("1"), Some("1"), None)),
            Err(DecodeError::InvalidProductId {
                row_id: "row-1".to_string(),
                raw: "123".to_string()
            })
        );
        assert!(matches!(
            decode_sale_item(&raw(Some("  "), Some("1"), Some("1"), None)),
            Err(DecodeError::MissingProductId { .. })
        ));
        assert!(matches!(
            decode_sale_item(&raw(None, Some("1"), Some("1"), None)),
            Err(DecodeError::MissingProductId { .. })
        ));
    }

    #[test]
    fn test_missing_name_falls_back_to_id() {
        let record = decode_sale_item(&raw(Some(PRODUCT), Some("1"), Some("1"), Some(" "))).unwrap();
        assert_eq!(record.product_name, PRODUCT);
    }

    #[test]
    fn test_decode_batch_keeps_rejections() {
        let rows = vec![
            raw(Some(PRODUCT), Some("1"), Some("1"), Some("Sal")),
            raw(Some("nope"), Some("1"), Some("1"), Some("Sal")),
            raw(Some(PRODUCT), Some("2"), Some("1"), Some("Sal")),
        ];
        let batch = decode_batch(&rows);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.rejected_count(), 1);
    }

    #[test]
    fn test_record_new_clamps_negatives() {
        let id = Uuid::parse_str(PRODUCT).unwrap();
        let record = SaleItemRecord::new(id, "Sal", -4, Money::from_cents(-100));
        assert_eq!(record.quantity, 0);
        assert!(record.unit_cost.is_zero());
    }
}
