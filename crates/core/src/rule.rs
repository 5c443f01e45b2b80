use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Id of the reserved catch-all rule synthesized by the categorizer.
/// Sorts after conventional ids so a real priority-1 rule wins the tie-break.
pub const FALLBACK_RULE_ID: &str = "ZZZ-DEFAULT";

/// Priority bounds enforced when rules are created through the store.
pub const MIN_PRIORITY: u32 = 1;
pub const MAX_PRIORITY: u32 = 150;

/// A single categorization rule. Matching is case-insensitive substring
/// containment of `pattern` in the canonical vendor; the highest priority
/// among matching rules wins, ties broken by ascending `id`.
///
/// `override_rule_id` is audit metadata only — precedence comes entirely
/// from `priority`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "RuleID")]
    pub id: String,
    #[serde(rename = "Priority")]
    pub priority: u32,
    #[serde(rename = "VendorPattern")]
    pub pattern: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Explanation")]
    pub explanation: String,
    #[serde(rename = "OverrideRuleID")]
    pub override_rule_id: Option<String>,
    #[serde(rename = "IsCustom", with = "crate::yes_no")]
    pub is_custom: bool,
    #[serde(rename = "CreatedDate")]
    pub created_date: NaiveDate,
}

impl Rule {
    /// The reserved catch-all: priority 1, empty pattern (contained in every
    /// vendor string), resolving to the configured default category.
    pub fn fallback(default_category: &str) -> Self {
        Rule {
            id: FALLBACK_RULE_ID.to_string(),
            priority: MIN_PRIORITY,
            pattern: String::new(),
            category: default_category.to_string(),
            explanation: "Default category for unmatched vendors".to_string(),
            override_rule_id: None,
            is_custom: false,
            created_date: seed_date(),
        }
    }
}

fn seed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid seed date")
}

/// Built-in rule set: `(id, priority, pattern, category)`.
/// Fuel-station variants of grocery chains carry priority 110 so they win
/// over the priority-100 parent pattern.
const SEED_RULES: &[(&str, u32, &str, &str)] = &[
    ("G001", 100, "KROGER", "Groceries & Markets"),
    ("G002", 100, "INDIFRESH", "Groceries & Markets"),
    ("G003", 100, "CHERIANS INTERNATIONAL", "Groceries & Markets"),
    ("G004", 100, "FRESH MEAT IN MART", "Groceries & Markets"),
    ("G005", 100, "WEGMANS", "Groceries & Markets"),
    ("G006", 100, "PUBLIX", "Groceries & Markets"),
    ("G007", 100, "FCS FOOD AND NUTRITION", "Groceries & Markets"),
    ("G008", 100, "COSTCO", "Groceries & Markets"),
    ("R001", 100, "TACO BELL", "Restaurants & Food"),
    ("R002", 100, "DOMINOS", "Restaurants & Food"),
    ("R003", 100, "SUBWAY", "Restaurants & Food"),
    ("R004", 100, "CHIPOTLE", "Restaurants & Food"),
    ("R005", 100, "MCDONALDS", "Restaurants & Food"),
    ("R006", 100, "DESI DISTRICT", "Restaurants & Food"),
    ("R007", 100, "NALAN INDIAN CUISINE", "Restaurants & Food"),
    ("R008", 100, "DUNKIN", "Restaurants & Food"),
    ("S001", 90, "AMAZON", "Shopping & Retail"),
    ("S002", 90, "TARGET", "Shopping & Retail"),
    ("S003", 90, "WALMART", "Shopping & Retail"),
    ("S004", 90, "TJ MAXX", "Shopping & Retail"),
    ("S005", 90, "ROSS", "Shopping & Retail"),
    ("S006", 90, "DOLLAR TREE", "Shopping & Retail"),
    ("S007", 90, "TANISHQ", "Shopping & Retail"),
    ("S008", 90, "BEAUTY AMBASSADORS", "Shopping & Retail"),
    ("A001", 100, "SHELL", "Auto & Gas"),
    ("A002", 110, "KROGER FUEL", "Auto & Gas"),
    ("A003", 110, "COSTCO GAS", "Auto & Gas"),
    ("A004", 100, "WAWA", "Auto & Gas"),
    ("U001", 100, "COMCAST", "Utilities Bills & Insurance"),
    ("U002", 100, "TMOBILE", "Utilities Bills & Insurance"),
    ("U003", 100, "TELLO", "Utilities Bills & Insurance"),
    ("U004", 100, "SAWNEE ELECTRIC", "Utilities Bills & Insurance"),
    ("U005", 100, "CONSTELLATION ENERGY", "Utilities Bills & Insurance"),
    ("U006", 100, "TRAVELERS-GEICO", "Utilities Bills & Insurance"),
    ("U007", 100, "AAA LIFE INSURANCE", "Utilities Bills & Insurance"),
    ("U008", 100, "FC WATER&SEWER", "Utilities Bills & Insurance"),
    ("U009", 100, "RED OAK SANITATION", "Utilities Bills & Insurance"),
    ("U010", 100, "ATGPAY", "Utilities Bills & Insurance"),
    ("U011", 100, "NSM DBAMR.COOPER", "Utilities Bills & Insurance"),
    ("H001", 100, "TELADOC", "Health"),
    ("H002", 100, "EMORY CLINIC", "Health"),
    ("E001", 100, "AMC", "Entertainment"),
    ("E002", 100, "URBAN AIR", "Entertainment"),
    ("E003", 100, "HAWKMUSIC ACADEMY", "Entertainment"),
    ("E004", 100, "LEAGUE TENNIS", "Entertainment"),
    ("M001", 100, "HOME DEPOT", "Home & Services"),
    ("M002", 100, "WWP GOT BUGS", "Home & Services"),
];

/// The rule set a fresh installation starts with.
pub fn seed_rules() -> Vec<Rule> {
    SEED_RULES
        .iter()
        .map(|(id, priority, pattern, category)| Rule {
            id: (*id).to_string(),
            priority: *priority,
            pattern: (*pattern).to_string(),
            category: (*category).to_string(),
            explanation: format!("{pattern} transaction"),
            override_rule_id: None,
            is_custom: false,
            created_date: seed_date(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let rules = seed_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn seed_priorities_within_bounds() {
        for rule in seed_rules() {
            assert!(rule.priority >= MIN_PRIORITY && rule.priority <= MAX_PRIORITY);
        }
    }

    #[test]
    fn fuel_variants_outrank_parent_patterns() {
        let rules = seed_rules();
        let find = |id: &str| rules.iter().find(|r| r.id == id).unwrap();
        assert!(find("A002").priority > find("G001").priority);
        assert!(find("A003").priority > find("G008").priority);
    }

    #[test]
    fn fallback_matches_everything_by_containment() {
        let fb = Rule::fallback("Shopping & Retail");
        assert_eq!(fb.priority, MIN_PRIORITY);
        assert!("ANY VENDOR".contains(&fb.pattern));
        assert!(fb.id > "Z900".to_string());
    }

    #[test]
    fn seed_categories_are_built_in_names() {
        let names: HashSet<_> = crate::category::DEFAULT_CATEGORIES
            .iter()
            .map(|(name, _)| *name)
            .collect();
        for rule in seed_rules() {
            assert!(names.contains(rule.category.as_str()), "{}", rule.category);
        }
    }
}
