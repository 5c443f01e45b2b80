//! Category totals over a categorized transaction set.

use centavo_core::{builtin_categories, Category, CategorizedTransaction, Money, Vendor};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct VendorTotal {
    pub vendor: Vendor,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Money,
    /// Zero-safe share of the grand total, `|total| / |grand| * 100`.
    pub percent: f64,
    /// Per-vendor totals within the category, in first-seen order.
    pub vendors: Vec<VendorTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendingSummary {
    /// One entry per category in the category store's stored order.
    /// Categories with no transactions appear with a zero total.
    pub categories: Vec<CategoryTotal>,
    pub grand_total: Money,
}

/// Sum categorized transactions into per-category totals.
///
/// The accumulator set and its order come from the category store snapshot;
/// a transaction whose category is absent from the store is omitted from
/// the output (the management layer, not the engine, is responsible for
/// keeping rules and categories consistent). An empty snapshot falls back
/// to the built-in category order so reports remain generable without a
/// category file.
pub fn aggregate(
    transactions: &[CategorizedTransaction],
    categories: &[Category],
) -> SpendingSummary {
    let order: Vec<String> = if categories.is_empty() {
        builtin_categories().into_iter().map(|c| c.name).collect()
    } else {
        categories.iter().map(|c| c.name.clone()).collect()
    };

    let index: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut totals = vec![Money::zero(); order.len()];
    let mut vendor_totals: Vec<Vec<VendorTotal>> = vec![Vec::new(); order.len()];
    let mut vendor_index: Vec<HashMap<Vendor, usize>> = vec![HashMap::new(); order.len()];

    for tx in transactions {
        let Some(&slot) = index.get(tx.category.as_str()) else {
            continue;
        };
        totals[slot] += tx.transaction.amount;
        let vendors = &mut vendor_totals[slot];
        match vendor_index[slot].get(&tx.vendor) {
            Some(&v) => vendors[v].total += tx.transaction.amount,
            None => {
                vendor_index[slot].insert(tx.vendor.clone(), vendors.len());
                vendors.push(VendorTotal {
                    vendor: tx.vendor.clone(),
                    total: tx.transaction.amount,
                });
            }
        }
    }

    let grand_total: Money = totals.iter().copied().sum();
    let categories = order
        .into_iter()
        .zip(totals)
        .zip(vendor_totals)
        .map(|((name, total), vendors)| CategoryTotal {
            name,
            percent: total.percent_of(grand_total),
            total,
            vendors,
        })
        .collect();

    SpendingSummary {
        categories,
        grand_total,
    }
}

/// Transactions whose magnitude strictly exceeds `threshold`, ordered by
/// date.
pub fn large_transactions<'a>(
    transactions: &'a [CategorizedTransaction],
    threshold: Money,
) -> Vec<&'a CategorizedTransaction> {
    let mut large: Vec<&CategorizedTransaction> = transactions
        .iter()
        .filter(|tx| tx.transaction.amount.abs() > threshold.abs())
        .collect();
    large.sort_by_key(|tx| tx.transaction.date);
    large
}
