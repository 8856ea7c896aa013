//! # faltantes
//!
//! Prints the shortage report of one business as clipboard text (or JSON).
//!
//! ## Usage
//! ```bash
//! faltantes --business 6f1c0a54-0c0e-4a8e-9b0a-2a3f4e5d6c7b --days 7
//! faltantes --business <id> --days 30 --locale en-us --out faltantes.txt
//! faltantes --business <id> --json > report.json
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`) so stdout carries only
//! the report. Ctrl-C cancels the fetch in flight.
//!
//! The store is opened read-only and must already exist with its schema
//! (run `seed`, or the register, against it first).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use merma_core::validation::validate_uuid;
use merma_core::{format_clipboard, DayWindow, Locale, ReportStyle};
use merma_db::{AppConfig, Database, ShortageService};

#[derive(Debug, Parser)]
#[command(name = "faltantes", version, about = "Shortage report for one business")]
struct Args {
    /// Business id
    #[arg(short, long)]
    business: String,

    /// Days to look back: 1, 3, 7, 14 or 30 [default: from config, else 7]
    #[arg(short, long, value_parser = parse_window)]
    days: Option<DayWindow>,

    /// SQLite database file (overrides config and MERMA_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// TOML config file (else MERMA_CONFIG, else ./merma.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Number format: es-co or en-us
    #[arg(long)]
    locale: Option<Locale>,

    /// Emit the full report as JSON
    #[arg(long)]
    json: bool,

    /// Include current stock on each line
    #[arg(long)]
    show_stock: bool,
}

fn parse_window(value: &str) -> Result<DayWindow, String> {
    let days: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of days"))?;
    DayWindow::from_days(days).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    validate_uuid("business id", &args.business)?;

    let mut config = AppConfig::load(args.config.clone()).context("loading configuration")?;
    if let Some(path) = &args.db {
        config.database.path = path.clone();
    }
    let window = args.days.unwrap_or(config.report.default_days);
    let locale = args.locale.unwrap_or(config.report.locale);

    let db = Database::new(config.db_config().read_only())
        .await
        .with_context(|| format!("opening {}", config.database.path.display()))?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling report");
            on_interrupt.cancel();
        }
    });

    let report = ShortageService::from_settings(db.clone(), &config.report)
        .report(args.business.trim(), window, &cancel)
        .await
        .context("building shortage report")?;
    db.close().await;

    if !report.completeness.is_complete() {
        warn!(completeness = ?report.completeness, "Report built from partial data");
    }
    if report.rejected_rows > 0 {
        warn!(rejected = report.rejected_rows, "Some sale items were skipped");
    }

    let text = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        format_clipboard(&report, &ReportStyle::new(locale).with_stock(args.show_stock))
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("7").unwrap(), DayWindow::Week);
        assert_eq!(parse_window(" 30 ").unwrap(), DayWindow::Month);
        assert!(parse_window("5").is_err());
        assert!(parse_window("week").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "faltantes",
            "--business",
            "6f1c0a54-0c0e-4a8e-9b0a-2a3f4e5d6c7b",
            "--days",
            "14",
            "--locale",
            "en-us",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.days, Some(DayWindow::TwoWeeks));
        assert_eq!(args.locale, Some(Locale::EnUs));
        assert!(args.json);
        assert!(args.out.is_none());
    }

    #[test]
    fn test_business_is_required() {
        assert!(Args::try_parse_from(["faltantes", "--days", "7"]).is_err());
        assert!(Args::try_parse_from(["faltantes", "--business", "x", "--days", "2"]).is_err());
    }
}
