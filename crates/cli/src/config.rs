use anyhow::Context as _;
use centavo_core::Money;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "centavo.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule store file, reloaded fresh before every run.
    pub rules_file: PathBuf,
    /// Category store file.
    pub categories_file: PathBuf,
    /// Category assigned when no rule matches a vendor.
    pub default_category: String,
    /// Magnitude above which a transaction is flagged as large.
    pub large_transaction_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rules_file: PathBuf::from("category_rules.csv"),
            categories_file: PathBuf::from("categories.csv"),
            default_category: "Shopping & Retail".to_string(),
            large_transaction_threshold: 200.0,
        }
    }
}

impl Config {
    /// An explicit `--config` path must exist; otherwise `centavo.toml` in
    /// the working directory is used when present, else the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Config::default());
                }
                fallback
            }
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn threshold(&self) -> Money {
        let value = Decimal::from_f64(self.large_transaction_threshold)
            .unwrap_or_else(|| Decimal::from(200));
        Money::from_decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_config_present() {
        let config = Config::default();
        assert_eq!(config.default_category, "Shopping & Retail");
        assert_eq!(config.threshold(), Money::from_cents(20000));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("default_category = \"Misc\"\n").unwrap();
        assert_eq!(config.default_category, "Misc");
        assert_eq!(config.rules_file, PathBuf::from("category_rules.csv"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn full_config_round_trips_through_toml() {
        let config = Config {
            rules_file: PathBuf::from("/data/rules.csv"),
            categories_file: PathBuf::from("/data/categories.csv"),
            default_category: "Uncategorized".to_string(),
            large_transaction_threshold: 350.0,
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.default_category, "Uncategorized");
        assert_eq!(parsed.threshold(), Money::from_cents(35000));
    }
}
