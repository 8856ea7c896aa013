//! # Sales & Expense Summaries
//!
//! Dashboard groupings: sales per ISO week or calendar month, expenses per
//! category.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, Sale};

/// Bucket size for sales summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    /// Bucket key for a timestamp: `2026-W42` or `2026-10`.
    ///
    /// Keys sort chronologically as strings.
    pub fn key(self, at: DateTime<Utc>) -> String {
        match self {
            Period::Week => {
                let week = at.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Month => format!("{}-{:02}", at.year(), at.month()),
        }
    }
}

/// Sales aggregated over one period bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesBucket {
    pub period: String,
    pub sale_count: usize,
    pub total: Money,
}

/// Groups sales into period buckets, oldest first.
pub fn summarize_sales(sales: &[Sale], period: Period) -> Vec<SalesBucket> {
    let mut buckets: BTreeMap<String, (usize, Money)> = BTreeMap::new();
    for sale in sales {
        let entry = buckets.entry(period.key(sale.created_at)).or_default();
        entry.0 += 1;
        entry.1 += sale.total();
    }

    buckets
        .into_iter()
        .map(|(period, (sale_count, total))| SalesBucket {
            period,
            sale_count,
            total,
        })
        .collect()
}

/// Expenses aggregated over one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseBucket {
    pub category: String,
    pub expense_count: usize,
    pub total: Money,
}

/// Groups expenses by category, largest total first.
///
/// Categories are free text: they are trimmed and uppercased so that
/// `"servicios"` and `"Servicios "` land together; a blank category becomes
/// `SIN CATEGORIA`.
pub fn summarize_expenses_by_category(expenses: &[Expense]) -> Vec<ExpenseBucket> {
    let mut buckets: HashMap<String, (usize, Money)> = HashMap::new();
    for expense in expenses {
        let category = match expense.category.trim() {
            "" => "SIN CATEGORIA".to_string(),
            c => c.to_uppercase(),
        };
        let entry = buckets.entry(category).or_default();
        entry.0 += 1;
        entry.1 += expense.amount();
    }

    let mut out: Vec<ExpenseBucket> = buckets
        .into_iter()
        .map(|(category, (expense_count, total))| ExpenseBucket {
            category,
            expense_count,
            total,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(total: i64, y: i32, m: u32, d: u32) -> Sale {
        Sale {
            id: format!("s-{y}{m}{d}-{total}"),
            business_id: "b1".to_string(),
            shift_id: None,
            total_cents: total,
            created_at: Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        }
    }

    fn expense(category: &str, amount: i64) -> Expense {
        Expense {
            id: format!("e-{category}-{amount}"),
            business_id: "b1".to_string(),
            category: category.to_string(),
            description: None,
            amount_cents: amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_period_keys() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        assert_eq!(Period::Week.key(at), "2026-W42");
        assert_eq!(Period::Month.key(at), "2026-10");

        // 2027-01-01 belongs to ISO week 53 of 2026.
        let new_year = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Period::Week.key(new_year), "2026-W53");
    }

    #[test]
    fn test_summarize_sales_by_month() {
        let sales = vec![
            sale(1_000, 2026, 10, 2),
            sale(500, 2026, 9, 30),
            sale(2_000, 2026, 10, 18),
        ];
        let buckets = summarize_sales(&sales, Period::Month);
        assert_eq!(
            buckets,
            vec![
                SalesBucket {
                    period: "2026-09".to_string(),
                    sale_count: 1,
                    total: Money::from_cents(500)
                },
                SalesBucket {
                    period: "2026-10".to_string(),
                    sale_count: 2,
                    total: Money::from_cents(3_000)
                },
            ]
        );
    }

    #[test]
    fn test_summarize_sales_by_week() {
        let sales = vec![sale(100, 2026, 10, 12), sale(100, 2026, 10, 18), sale(100, 2026, 10, 19)];
        let buckets = summarize_sales(&sales, Period::Week);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2026-W42");
        assert_eq!(buckets[0].sale_count, 2);
        assert_eq!(buckets[1].period, "2026-W43");
    }

    #[test]
    fn test_summarize_expenses() {
        let expenses = vec![
            expense("Servicios", 50_000),
            expense("servicios ", 20_000),
            expense("Arriendo", 100_000),
            expense("  ", 1_000),
        ];
        let buckets = summarize_expenses_by_category(&expenses);
        assert_eq!(buckets[0].category, "ARRIENDO");
        assert_eq!(buckets[1].category, "SERVICIOS");
        assert_eq!(buckets[1].expense_count, 2);
        assert_eq!(buckets[1].total, Money::from_cents(70_000));
        assert_eq!(buckets[2].category, "SIN CATEGORIA");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(summarize_sales(&[], Period::Week).is_empty());
        assert!(summarize_expenses_by_category(&[]).is_empty());
    }
}
