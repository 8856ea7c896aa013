//! # Shortage Aggregator ("faltantes")
//!
//! Compares what a business sold in a window against what it has left.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shortage Aggregation                                 │
//! │                                                                         │
//! │  SaleItemRecord[] ──► sold: product_id → units (first name/cost wins)  │
//! │                                │                                        │
//! │  InventoryLevel[] ──► stock: product_id → units                         │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                   ShortageRow per product with units_sold > 0           │
//! │                     units_short      = max(sold − stock, 0)             │
//! │                     needs_inspection = stock == 0 && sold > 0           │
//! │                     replenish_cost   = unit_cost × sold                 │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                   group_by_category ──► CategoryGroup[] (subtotals)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Replenishment cost covers every unit sold, not only the units short:
//! the report answers "what does it cost to put back what left the shelf".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;
use uuid::Uuid;

use crate::category::{classify, resolve_order, Category};
use crate::decode::SaleItemRecord;
use crate::money::Money;
use crate::types::{DayWindow, InventoryLevel};

// =============================================================================
// Shortage Row
// =============================================================================

/// Sold-versus-remaining figures for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShortageRow {
    #[ts(as = "String")]
    pub product_id: Uuid,
    pub name: String,
    pub category: Category,
    pub units_sold: i64,
    pub current_stock: i64,
    pub units_short: i64,
    pub needs_inspection: bool,
    pub unit_cost: Money,
    pub replenish_cost: Money,
}

impl ShortageRow {
    /// Derives every computed column from sold units, stock and unit cost.
    pub fn new(
        product_id: Uuid,
        name: String,
        units_sold: i64,
        current_stock: i64,
        unit_cost: Money,
    ) -> Self {
        let units_sold = units_sold.max(0);
        let current_stock = current_stock.max(0);
        let unit_cost = if unit_cost.is_negative() {
            Money::zero()
        } else {
            unit_cost
        };

        ShortageRow {
            product_id,
            category: classify(&name),
            name,
            units_sold,
            current_stock,
            units_short: units_sold.saturating_sub(current_stock).max(0),
            needs_inspection: current_stock == 0 && units_sold > 0,
            unit_cost,
            replenish_cost: unit_cost.multiply_quantity(units_sold),
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

struct SoldProduct {
    name: String,
    unit_cost: Money,
    units: i64,
}

impl SoldProduct {
    fn add_units(&mut self, quantity: i64) {
        self.units = self.units.saturating_add(quantity);
    }
}

/// Aggregates decoded sale items against an inventory snapshot.
///
/// Rows with `quantity <= 0` are ignored. Products absent from `inventory`
/// count as zero stock. The output is sorted by default category order,
/// then name, then product id.
pub fn aggregate_shortages(
    items: &[SaleItemRecord],
    inventory: &[InventoryLevel],
) -> Vec<ShortageRow> {
    let mut sold: HashMap<Uuid, SoldProduct> = HashMap::new();
    for item in items.iter().filter(|i| i.quantity > 0) {
        sold.entry(item.product_id)
            .or_insert_with(|| SoldProduct {
                name: item.product_name.clone(),
                unit_cost: item.unit_cost,
                units: 0,
            })
            .add_units(item.quantity);
    }

    // Inventory ids come from the store as text; unparseable ones can never
    // match a sold product.
    let stock: HashMap<Uuid, i64> = inventory
        .iter()
        .filter_map(|level| {
            Uuid::parse_str(level.product_id.trim())
                .ok()
                .map(|id| (id, level.stock))
        })
        .collect();

    let mut rows: Vec<ShortageRow> = sold
        .into_iter()
        .filter(|(_, product)| product.units > 0)
        .map(|(id, product)| {
            let current = stock.get(&id).copied().unwrap_or(0);
            ShortageRow::new(id, product.name, product.units, current, product.unit_cost)
        })
        .collect();

    let order = Category::display_order();
    rows.sort_by(|a, b| {
        rank(&order, a.category)
            .cmp(&rank(&order, b.category))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    rows
}

fn saturating_units(units: impl Iterator<Item = i64>) -> i64 {
    units.fold(0, i64::saturating_add)
}

fn rank(order: &[Category], category: Category) -> usize {
    order
        .iter()
        .position(|c| *c == category)
        .unwrap_or(order.len())
}

// =============================================================================
// Category Groups
// =============================================================================

/// Rows of one category with their subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryGroup {
    pub category: Category,
    pub rows: Vec<ShortageRow>,
    pub units_sold: i64,
    pub replenish_cost: Money,
}

/// Groups rows by category in `order` (unlisted categories follow in
/// default display order). Empty categories are omitted.
pub fn group_by_category(rows: Vec<ShortageRow>, order: &[Category]) -> Vec<CategoryGroup> {
    let mut buckets: HashMap<Category, Vec<ShortageRow>> = HashMap::new();
    for row in rows {
        buckets.entry(row.category).or_default().push(row);
    }

    resolve_order(order)
        .into_iter()
        .filter_map(|category| {
            let rows = buckets.remove(&category)?;
            Some(CategoryGroup {
                category,
                units_sold: saturating_units(rows.iter().map(|r| r.units_sold)),
                replenish_cost: rows.iter().map(|r| r.replenish_cost).sum(),
                rows,
            })
        })
        .collect()
}

// =============================================================================
// Report
// =============================================================================

/// Whether every page of the underlying data was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportCompleteness {
    Complete,
    /// Built from partial data; `reason` carries the fetch error.
    Partial { reason: String },
}

impl ReportCompleteness {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReportCompleteness::Complete)
    }
}

/// A complete shortage report for one business and window.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShortageReport {
    pub business_id: String,
    pub business_name: String,
    pub window_days: u32,
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub groups: Vec<CategoryGroup>,
    pub total_units: i64,
    pub total_cost: Money,
    pub inspection_count: usize,
    /// Sale-item rows dropped because their product id was unusable.
    pub rejected_rows: usize,
    pub completeness: ReportCompleteness,
}

impl ShortageReport {
    /// Builds the report from aggregated rows.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        business_id: impl Into<String>,
        business_name: impl Into<String>,
        window: DayWindow,
        generated_at: DateTime<Utc>,
        rows: Vec<ShortageRow>,
        order: &[Category],
        rejected_rows: usize,
        completeness: ReportCompleteness,
    ) -> Self {
        let inspection_count = rows.iter().filter(|r| r.needs_inspection).count();
        let groups = group_by_category(rows, order);

        ShortageReport {
            business_id: business_id.into(),
            business_name: business_name.into(),
            window_days: window.days(),
            generated_at,
            total_units: saturating_units(groups.iter().map(|g| g.units_sold)),
            total_cost: groups.iter().map(|g| g.replenish_cost).sum(),
            inspection_count,
            rejected_rows,
            completeness,
            groups,
        }
    }

    /// Iterates every row across groups, in report order.
    pub fn rows(&self) -> impl Iterator<Item = &ShortageRow> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
