//! # Clipboard Report Formatter
//!
//! Renders a [`ShortageReport`] as plain text meant to be pasted into a chat
//! app. Pure formatting: no clipboard access happens here.
//!
//! ## Layout
//! ```text
//! *FALTANTES - Tienda La Esquina*
//! Últimos 7 días (18/10/2026)
//!
//! *LECHE*
//! - Leche entera: 5 → $ 20.000 ⚠ sin stock
//! Subtotal LECHE: 5 und → $ 20.000
//!
//! *TOTAL A REPONER: 5 und → $ 20.000*
//! ```

use crate::money::{Locale, Money};
use crate::shortage::{ReportCompleteness, ShortageReport};

/// Formatting options for [`format_clipboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportStyle {
    pub locale: Locale,
    /// Append units short and stock to each line.
    pub show_stock: bool,
}

impl ReportStyle {
    pub fn new(locale: Locale) -> Self {
        ReportStyle {
            locale,
            show_stock: false,
        }
    }

    pub fn with_stock(mut self, show: bool) -> Self {
        self.show_stock = show;
        self
    }
}

/// Formats the shortage report as a newline-joined text block.
///
/// ```rust
/// use chrono::Utc;
/// use merma_core::report::{format_clipboard, ReportStyle};
/// use merma_core::shortage::{ReportCompleteness, ShortageReport};
/// use merma_core::DayWindow;
///
/// let report = ShortageReport::build(
///     "b1", "Tienda", DayWindow::Week, Utc::now(), vec![], &[], 0,
///     ReportCompleteness::Complete,
/// );
/// let text = format_clipboard(&report, &ReportStyle::default());
/// assert!(text.contains("Sin faltantes"));
/// assert!(text.ends_with("*TOTAL A REPONER: 0 und → $ 0*"));
/// ```
pub fn format_clipboard(report: &ShortageReport, style: &ReportStyle) -> String {
    let money = |m: Money| m.format_locale(style.locale);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("*FALTANTES - {}*", report.business_name.trim()));
    lines.push(format!(
        "{} ({})",
        capitalize(&window_label(report.window_days)),
        report.generated_at.format("%d/%m/%Y")
    ));

    if let ReportCompleteness::Partial { reason } = &report.completeness {
        lines.push(format!("⚠ Datos incompletos: {reason}"));
    }

    if report.is_empty() {
        lines.push(String::new());
        lines.push("Sin faltantes en el periodo".to_string());
    }

    for group in &report.groups {
        lines.push(String::new());
        lines.push(format!("*{}*", group.category));
        for row in &group.rows {
            let mut line = format!(
                "- {}: {} → {}",
                row.name,
                row.units_sold,
                money(row.replenish_cost)
            );
            if style.show_stock {
                line.push_str(&format!(
                    " (stock {}, faltan {})",
                    row.current_stock, row.units_short
                ));
            }
            if row.needs_inspection {
                line.push_str(" ⚠ sin stock");
            }
            lines.push(line);
        }
        lines.push(format!(
            "Subtotal {}: {} und → {}",
            group.category,
            group.units_sold,
            money(group.replenish_cost)
        ));
    }

    if report.inspection_count > 0 {
        lines.push(String::new());
        lines.push(format!(
            "Revisar inventario: {} producto(s) vendidos sin stock",
            report.inspection_count
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "*TOTAL A REPONER: {} und → {}*",
        report.total_units,
        money(report.total_cost)
    ));

    lines.join("\n")
}

fn window_label(days: u32) -> String {
    match days {
        1 => "último día".to_string(),
        n => format!("últimos {n} días"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::decode::SaleItemRecord;
    use crate::shortage::aggregate_shortages;
    use crate::types::{DayWindow, InventoryLevel};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_report(completeness: ReportCompleteness) -> ShortageReport {
        let leche = Uuid::from_u128(1);
        let arroz = Uuid::from_u128(2);
        let rows = aggregate_shortages(
            &[
                SaleItemRecord::new(leche, "Leche entera", 5, Money::from_cents(400_000)),
                SaleItemRecord::new(arroz, "Arroz Diana", 2, Money::from_cents(350_000)),
            ],
            &[
                InventoryLevel {
                    product_id: leche.to_string(),
                    business_id: "b1".to_string(),
                    stock: 0,
                },
                InventoryLevel {
                    product_id: arroz.to_string(),
                    business_id: "b1".to_string(),
                    stock: 10,
                },
            ],
        );
        ShortageReport::build(
            "b1",
            "Tienda La Esquina",
            DayWindow::Week,
            Utc.with_ymd_and_hms(2026, 10, 18, 15, 0, 0).unwrap(),
            rows,
            &Category::display_order(),
            0,
            completeness,
        )
    }

    #[test]
    fn test_format_full_report() {
        let text = format_clipboard(&sample_report(ReportCompleteness::Complete), &ReportStyle::default());
        let expected = [
            "*FALTANTES - Tienda La Esquina*",
            "Últimos 7 días (18/10/2026)",
            "",
            "*ARROZ*",
            "- Arroz Diana: 2 → $ 7.000",
            "Subtotal ARROZ: 2 und → $ 7.000",
            "",
            "*LECHE*",
            "- Leche entera: 5 → $ 20.000 ⚠ sin stock",
            "Subtotal LECHE: 5 und → $ 20.000",
            "",
            "Revisar inventario: 1 producto(s) vendidos sin stock",
            "",
            "*TOTAL A REPONER: 7 und → $ 27.000*",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_with_stock_and_en_us() {
        let style = ReportStyle::new(Locale::EnUs).with_stock(true);
        let text = format_clipboard(&sample_report(ReportCompleteness::Complete), &style);
        assert!(text.contains("- Arroz Diana: 2 → $7,000.00 (stock 10, faltan 0)"));
        assert!(text.contains("- Leche entera: 5 → $20,000.00 (stock 0, faltan 5) ⚠ sin stock"));
    }

    #[test]
    fn test_partial_report_is_flagged() {
        let text = format_clipboard(
            &sample_report(ReportCompleteness::Partial {
                reason: "page 3 failed".to_string(),
            }),
            &ReportStyle::default(),
        );
        assert!(text.contains("⚠ Datos incompletos: page 3 failed"));
    }

    #[test]
    fn test_one_day_label() {
        assert_eq!(capitalize(&window_label(1)), "Último día");
    }
}
