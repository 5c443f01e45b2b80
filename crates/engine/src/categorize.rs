//! Category resolution over an immutable rule snapshot.

use centavo_core::{Rule, Vendor};

/// Rule paired with its upper-cased pattern, so per-vendor matching does a
/// single case fold of the vendor rather than one per rule.
struct MatchRule {
    rule: Rule,
    pattern_upper: String,
}

/// Resolves a canonical vendor to a category.
///
/// Built once per run from a snapshot of the rule store plus the configured
/// default category; the snapshot is never mutated. The rules are sorted at
/// construction by priority descending, then id ascending, so the first
/// match during lookup is exactly the winner: strictly highest priority,
/// ties broken by the lexicographically smallest rule id. A reserved
/// priority-1 rule with an empty pattern (substring of every vendor)
/// guarantees a match, resolving to the default category.
pub struct Categorizer {
    rules: Vec<MatchRule>,
}

impl Categorizer {
    pub fn new(rules: Vec<Rule>, default_category: &str) -> Self {
        let mut rules: Vec<MatchRule> = rules
            .into_iter()
            .chain(std::iter::once(Rule::fallback(default_category)))
            .map(|rule| MatchRule {
                pattern_upper: rule.pattern.to_uppercase(),
                rule,
            })
            .collect();
        rules.sort_by(|a, b| {
            b.rule
                .priority
                .cmp(&a.rule.priority)
                .then_with(|| a.rule.id.cmp(&b.rule.id))
        });
        Categorizer { rules }
    }

    /// The winning rule for this vendor. Callers typically read
    /// `.category`; the full rule is returned so audit surfaces can show
    /// which rule fired.
    pub fn categorize(&self, vendor: &Vendor) -> &Rule {
        let v = vendor.as_str().to_uppercase();
        self.rules
            .iter()
            .find(|mr| v.contains(&mr.pattern_upper))
            .map(|mr| &mr.rule)
            .expect("reserved fallback rule matches every vendor")
    }

    /// Every rule whose pattern matches this vendor, in winning order.
    /// Used by the `rules test` audit command.
    pub fn matching_rules(&self, vendor: &Vendor) -> Vec<&Rule> {
        let v = vendor.as_str().to_uppercase();
        self.rules
            .iter()
            .filter(|mr| v.contains(&mr.pattern_upper))
            .map(|mr| &mr.rule)
            .collect()
    }
}
