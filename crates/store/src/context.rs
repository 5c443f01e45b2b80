//! Plain-text rendering of the rule/category snapshot.
//!
//! The natural-language query layer grounds its prompts in the same
//! snapshot the engine categorizes with; it consumes this text, not the
//! matching algorithm. Rules resolving to categories missing from the
//! store are flagged here so the gap is visible at the management surface
//! rather than silently dropped at aggregation.

use centavo_core::{Category, Rule};
use std::collections::HashSet;
use std::fmt::Write;

pub fn context_text(rules: &[Rule], categories: &[Category]) -> String {
    let known: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let mut out = String::new();

    out.push_str("Spending categories:\n");
    for cat in categories {
        let _ = write!(out, "- {}", cat.name);
        if cat.is_user_defined {
            out.push_str(" (user-defined)");
        }
        if let Some(parent) = &cat.parent {
            let _ = write!(out, " [parent: {parent}]");
        }
        if !cat.description.is_empty() {
            let _ = write!(out, ": {}", cat.description);
        }
        out.push('\n');
    }

    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

    out.push_str("\nCategorization rules (highest priority wins):\n");
    for rule in ordered {
        let _ = write!(
            out,
            "- [{:>3}] {}: vendors containing '{}' -> {}",
            rule.priority, rule.id, rule.pattern, rule.category
        );
        if let Some(target) = &rule.override_rule_id {
            let _ = write!(out, " (overrides {target})");
        }
        if !known.contains(rule.category.as_str()) {
            out.push_str(" [category not in store]");
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use centavo_core::{builtin_categories, seed_rules};
    use chrono::NaiveDate;

    #[test]
    fn lists_rules_in_priority_order() {
        let text = context_text(&seed_rules(), &builtin_categories());
        let fuel = text.find("A002").unwrap();
        let parent = text.find("G001").unwrap();
        assert!(fuel < parent, "higher priority rule listed first");
    }

    #[test]
    fn flags_rules_with_unknown_categories() {
        let mut rules = seed_rules();
        rules.push(Rule {
            id: "C001".to_string(),
            priority: 115,
            pattern: "HAWK".to_string(),
            category: "Education".to_string(),
            explanation: String::new(),
            override_rule_id: Some("E003".to_string()),
            is_custom: true,
            created_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        });
        let text = context_text(&rules, &builtin_categories());
        assert!(text.contains("'HAWK' -> Education (overrides E003) [category not in store]"));
    }

    #[test]
    fn shows_hierarchy_and_user_defined_markers() {
        let mut cats = builtin_categories();
        cats.push(Category::user_defined(
            "Education",
            Some("Entertainment"),
            "Classes and lessons",
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        ));
        let text = context_text(&[], &cats);
        assert!(text.contains("- Education (user-defined) [parent: Entertainment]: Classes and lessons"));
    }
}
