use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use centavo_core::{CategorizedTransaction, Money, Month};
use centavo_engine::{aggregate, large_transactions, Categorizer, SpendingSummary, VendorNormalizer};
use centavo_ingest::{ingest_file, IngestOptions};
use centavo_store::{CategoryStore, RuleStore};

use crate::config::Config;

#[derive(Args)]
pub struct ReportArgs {
    /// Directory containing statement exports.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Restrict the report to one statement month (MM/YYYY).
    #[arg(long)]
    month: Option<Month>,

    /// Flag transactions whose magnitude exceeds this amount.
    #[arg(long)]
    threshold: Option<f64>,

    /// Emit the summary as JSON for downstream report formatters.
    #[arg(long)]
    json: bool,
}

/// JSON payload consumed by the external report-formatting layer.
#[derive(Serialize)]
struct ReportPayload<'a> {
    month: Option<Month>,
    summary: &'a SpendingSummary,
    large_transactions: &'a [&'a CategorizedTransaction],
}

pub fn run(config: &Config, args: ReportArgs) -> anyhow::Result<()> {
    // Fresh snapshots per run; nothing here writes back to the stores.
    let rules = RuleStore::open_or_seed(&config.rules_file)?;
    let categories = CategoryStore::load_or_seed(&config.categories_file)?;
    let normalizer = VendorNormalizer::with_defaults()?;
    let categorizer = Categorizer::new(rules.snapshot(), &config.default_category);

    let options = IngestOptions { month: args.month };
    let mut files: Vec<PathBuf> = std::fs::read_dir(&args.dir)
        .with_context(|| format!("reading statement directory {}", args.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    anyhow::ensure!(
        !files.is_empty(),
        "no CSV statement files found in {}",
        args.dir.display()
    );

    let mut transactions = Vec::new();
    for file in &files {
        match ingest_file(file, &options) {
            Ok(mut rows) => {
                info!(file = %file.display(), rows = rows.len(), "statement ingested");
                transactions.append(&mut rows);
            }
            Err(err) => warn!(%err, "skipping unreadable statement file"),
        }
    }

    let categorized: Vec<CategorizedTransaction> = transactions
        .into_iter()
        .map(|transaction| {
            let vendor = normalizer.normalize(&transaction.description);
            let rule = categorizer.categorize(&vendor);
            CategorizedTransaction {
                category: rule.category.clone(),
                vendor,
                transaction,
            }
        })
        .collect();

    let summary = aggregate(&categorized, categories.categories());
    let threshold = match args.threshold {
        Some(value) => {
            use rust_decimal::prelude::FromPrimitive;
            Money::from_decimal(
                rust_decimal::Decimal::from_f64(value)
                    .ok_or_else(|| anyhow::anyhow!("invalid threshold {value}"))?,
            )
        }
        None => config.threshold(),
    };
    let large = large_transactions(&categorized, threshold);

    if args.json {
        let payload = ReportPayload {
            month: args.month,
            summary: &summary,
            large_transactions: &large,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_summary(&summary, &large, args.month, threshold);
    Ok(())
}

fn print_summary(
    summary: &SpendingSummary,
    large: &[&CategorizedTransaction],
    month: Option<Month>,
    threshold: Money,
) {
    println!("{}", "=".repeat(70));
    match month {
        Some(m) => println!("SPENDING SUMMARY FOR {m}"),
        None => println!("SPENDING SUMMARY"),
    }
    println!("{}", "=".repeat(70));

    for category in &summary.categories {
        println!(
            "  {:<40} ${:>10.2} ({:5.1}%)",
            category.name,
            category.total.to_f64().abs(),
            category.percent
        );
        for vendor in &category.vendors {
            println!(
                "      {:<36} ${:>10.2}",
                vendor.vendor.as_str(),
                vendor.total.to_f64().abs()
            );
        }
    }
    println!("{}", "-".repeat(70));
    println!(
        "  {:<40} ${:>10.2} (100.0%)",
        "TOTAL",
        summary.grand_total.to_f64().abs()
    );

    if large.is_empty() {
        println!("\nNo transactions over {threshold}");
        return;
    }
    println!("\nLarge transactions (> {threshold}): {}", large.len());
    println!("{}", "-".repeat(70));
    for tx in large {
        println!(
            "  {} | {:<40} ${:>10.2}",
            tx.transaction.date,
            tx.vendor.as_str(),
            tx.transaction.amount.to_f64().abs()
        );
    }
}
