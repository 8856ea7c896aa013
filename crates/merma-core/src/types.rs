//! # Domain Types
//!
//! Typed rows of the store tables plus the report window.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Business     │   │  ProductMaster  │   │ InventoryLevel  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  business_id    │       │
//! │  │  name           │   │  name           │   │  product_id     │       │
//! │  │  is_active      │   │  purchase_cost  │   │  stock          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    SaleItem     │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  business_id    │   │  sale_id        │   │  business_id    │       │
//! │  │  shift_id?      │   │  product_id     │   │  category       │       │
//! │  │  total_cents    │   │  quantity       │   │  amount_cents   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  DayWindow: 1 / 3 / 7 / 14 / 30 days back from "now"                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers of stored rows are kept as `String` (TEXT in SQLite). The
//! decoder is the only place that turns a product reference into a `Uuid`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Day Window
// =============================================================================

/// How far back a report looks. Only the fixed menu of windows is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DayWindow {
    OneDay,
    ThreeDays,
    Week,
    TwoWeeks,
    Month,
}

impl DayWindow {
    /// Every supported window, shortest first.
    pub const ALL: [DayWindow; 5] = [
        DayWindow::OneDay,
        DayWindow::ThreeDays,
        DayWindow::Week,
        DayWindow::TwoWeeks,
        DayWindow::Month,
    ];

    /// Returns the window length in days.
    pub const fn days(self) -> u32 {
        match self {
            DayWindow::OneDay => 1,
            DayWindow::ThreeDays => 3,
            DayWindow::Week => 7,
            DayWindow::TwoWeeks => 14,
            DayWindow::Month => 30,
        }
    }

    /// Looks up the window for a day count.
    ///
    /// ```rust
    /// use merma_core::DayWindow;
    ///
    /// assert_eq!(DayWindow::from_days(7).unwrap(), DayWindow::Week);
    /// assert!(DayWindow::from_days(5).is_err());
    /// ```
    pub fn from_days(days: u32) -> CoreResult<Self> {
        DayWindow::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or(CoreError::UnsupportedWindow { days })
    }

    /// Returns the inclusive lower bound of the window ending at `now`.
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days()))
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        DayWindow::Week
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days() {
            1 => write!(f, "último día"),
            n => write!(f, "últimos {} días", n),
        }
    }
}

impl TryFrom<u32> for DayWindow {
    type Error = CoreError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        DayWindow::from_days(days)
    }
}

impl From<DayWindow> for u32 {
    fn from(window: DayWindow) -> Self {
        window.days()
    }
}

// =============================================================================
// Business
// =============================================================================

/// A tenant / store location.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product Master
// =============================================================================

/// Canonical catalog record shared by every business.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductMaster {
    pub id: String,
    pub name: String,
    /// Purchase cost per unit, used for replenishment totals.
    pub purchase_cost: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Level
// =============================================================================

/// Current stock of one product at one business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryLevel {
    pub product_id: String,
    pub business_id: String,
    pub stock: i64,
}

// =============================================================================
// Shift
// =============================================================================

/// A work session of one employee at one business.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    pub id: String,
    pub business_id: String,
    pub employee_id: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale at a business.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub business_id: String,
    pub shift_id: Option<String>,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line of a sale. Quantity is what the shortage report counts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

// =============================================================================
// Expense
// =============================================================================

/// Money spent by a business, tagged with a free-text category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub business_id: String,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_window_menu() {
        let days: Vec<u32> = DayWindow::ALL.iter().map(|w| w.days()).collect();
        assert_eq!(days, vec![1, 3, 7, 14, 30]);

        for days in [1, 3, 7, 14, 30] {
            assert_eq!(DayWindow::from_days(days).unwrap().days(), days);
        }
        for days in [0, 2, 5, 31, 365] {
            assert!(matches!(
                DayWindow::from_days(days),
                Err(CoreError::UnsupportedWindow { .. })
            ));
        }
    }

    #[test]
    fn test_day_window_since() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let since = DayWindow::Week.since(now);
        assert_eq!(since, Utc.with_ymd_and_hms(2026, 10, 11, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_day_window_serde_as_number() {
        let json = serde_json::to_string(&DayWindow::TwoWeeks).unwrap();
        assert_eq!(json, "14");

        let window: DayWindow = serde_json::from_str("3").unwrap();
        assert_eq!(window, DayWindow::ThreeDays);

        assert!(serde_json::from_str::<DayWindow>("4").is_err());
    }

    #[test]
    fn test_day_window_display() {
        assert_eq!(DayWindow::OneDay.to_string(), "último día");
        assert_eq!(DayWindow::Month.to_string(), "últimos 30 días");
    }

    #[test]
    fn test_shift_is_open() {
        let shift = Shift {
            id: "s1".to_string(),
            business_id: "b1".to_string(),
            employee_id: "e1".to_string(),
            opened_at: Utc::now(),
            closed_at: None,
        };
        assert!(shift.is_open());
    }
}
