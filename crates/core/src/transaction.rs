use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Canonical merchant identity produced by the vendor normalizer and used
/// as the join key between a transaction and the rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vendor(String);

impl Vendor {
    pub fn new(name: impl Into<String>) -> Self {
        Vendor(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One spending row from a statement export. Ephemeral — produced by
/// ingestion, consumed by categorization and aggregation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub source_file: String,
}

/// A transaction joined with its canonical vendor and resolved category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedTransaction {
    pub transaction: Transaction,
    pub vendor: Vendor,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_display_and_as_str() {
        let v = Vendor::new("KROGER");
        assert_eq!(v.as_str(), "KROGER");
        assert_eq!(v.to_string(), "KROGER");
    }

    #[test]
    fn vendor_equality_is_exact() {
        assert_ne!(Vendor::new("KROGER"), Vendor::new("KROGER FUEL"));
    }
}
