//! The rule store: flat CSV rows, loaded fresh before every run and
//! mutated only through management operations that validate, back up, and
//! atomically replace the file.

use centavo_core::{seed_rules, Rule, MAX_PRIORITY, MIN_PRIORITY};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::backup::backup_and_replace;
use crate::error::StoreError;

pub struct RuleStore {
    path: PathBuf,
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Read an existing store file, preserving row order.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rules = Vec::new();
        for record in reader.deserialize() {
            rules.push(record?);
        }
        Ok(RuleStore {
            path: path.to_path_buf(),
            rules,
        })
    }

    /// Load the store, seeding the built-in rule set on first run.
    pub fn open_or_seed(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            return Self::load(path);
        }
        info!(path = %path.display(), "rule store missing, seeding built-in rules");
        let store = RuleStore {
            path: path.to_path_buf(),
            rules: seed_rules(),
        };
        store.save()?;
        Ok(store)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Owned copy handed to the categorizer as its immutable snapshot.
    pub fn snapshot(&self) -> Vec<Rule> {
        self.rules.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn custom_rules(&self) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.is_custom).collect()
    }

    pub fn add_rule(&mut self, rule: Rule) -> Result<(), StoreError> {
        self.validate(&rule, None)?;
        self.rules.push(rule);
        self.save()
    }

    /// Replace an existing rule wholesale, keyed by its id.
    pub fn update_rule(&mut self, rule: Rule) -> Result<(), StoreError> {
        let pos = self
            .rules
            .iter()
            .position(|r| r.id == rule.id)
            .ok_or_else(|| StoreError::RuleNotFound(rule.id.clone()))?;
        self.validate(&rule, Some(pos))?;
        self.rules[pos] = rule;
        self.save()
    }

    /// Copy an existing rule under a new id, marked custom so it shows up
    /// in the user-defined views.
    pub fn duplicate_rule(
        &mut self,
        source_id: &str,
        new_id: &str,
        created: chrono::NaiveDate,
    ) -> Result<Rule, StoreError> {
        let source = self
            .get(source_id)
            .ok_or_else(|| StoreError::RuleNotFound(source_id.to_string()))?;
        let mut copy = source.clone();
        copy.id = new_id.to_string();
        copy.is_custom = true;
        copy.created_date = created;
        self.add_rule(copy.clone())?;
        Ok(copy)
    }

    pub fn delete_rule(&mut self, id: &str) -> Result<Rule, StoreError> {
        let pos = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::RuleNotFound(id.to_string()))?;
        let removed = self.rules.remove(pos);
        self.save()?;
        Ok(removed)
    }

    /// Point a rule's advisory override link at another rule, or clear it.
    pub fn set_override(&mut self, id: &str, target: Option<&str>) -> Result<(), StoreError> {
        if let Some(target_id) = target {
            if self.get(target_id).is_none() {
                return Err(StoreError::UnknownOverrideTarget(target_id.to_string()));
            }
        }
        let pos = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::RuleNotFound(id.to_string()))?;
        if let Some(target_id) = target {
            let target_priority = self.rules.iter().find(|r| r.id == target_id).map(|r| r.priority);
            if let Some(tp) = target_priority {
                if self.rules[pos].priority <= tp {
                    warn!(
                        rule = id,
                        overrides = target_id,
                        "override has no effect: priority does not exceed the overridden rule's"
                    );
                }
            }
        }
        self.rules[pos].override_rule_id = target.map(str::to_string);
        self.save()
    }

    /// Write only the user-defined rules to a separate file.
    pub fn export_custom(&self, path: &Path) -> Result<usize, StoreError> {
        let custom: Vec<&Rule> = self.custom_rules();
        let mut writer = csv::Writer::from_writer(vec![]);
        for rule in &custom {
            writer.serialize(rule)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        std::fs::write(path, bytes)?;
        Ok(custom.len())
    }

    /// Persist the store: timestamped backup of the current file, then
    /// temp-write and atomic rename.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for rule in &self.rules {
            writer.serialize(rule)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        backup_and_replace(&self.path, &bytes)?;
        Ok(())
    }

    fn validate(&self, rule: &Rule, replacing: Option<usize>) -> Result<(), StoreError> {
        if rule.id.trim().is_empty() {
            return Err(StoreError::EmptyRuleField("id"));
        }
        if rule.pattern.trim().is_empty() {
            return Err(StoreError::EmptyRuleField("pattern"));
        }
        if rule.category.trim().is_empty() {
            return Err(StoreError::EmptyRuleField("category"));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&rule.priority) {
            return Err(StoreError::PriorityOutOfRange(rule.priority));
        }
        let duplicate = self
            .rules
            .iter()
            .enumerate()
            .any(|(i, r)| r.id == rule.id && replacing != Some(i));
        if duplicate {
            return Err(StoreError::DuplicateRuleId(rule.id.clone()));
        }
        if let Some(target_id) = &rule.override_rule_id {
            let Some(target) = self.get(target_id) else {
                return Err(StoreError::UnknownOverrideTarget(target_id.clone()));
            };
            // Advisory only: an override that does not out-prioritize its
            // target silently loses at match time, so surface it at edit
            // time.
            if rule.priority <= target.priority {
                warn!(
                    rule = %rule.id,
                    overrides = %target_id,
                    "override has no effect: priority does not exceed the overridden rule's"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rule(id: &str, priority: u32, pattern: &str, category: &str) -> Rule {
        Rule {
            id: id.to_string(),
            priority,
            pattern: pattern.to_string(),
            category: category.to_string(),
            explanation: format!("{pattern} transaction"),
            override_rule_id: None,
            is_custom: true,
            created_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> RuleStore {
        RuleStore::open_or_seed(&dir.path().join("category_rules.csv")).unwrap()
    }

    #[test]
    fn first_open_seeds_builtin_rules() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.rules().is_empty());
        assert!(store.get("G001").is_some());
        assert!(dir.path().join("category_rules.csv").exists());
    }

    #[test]
    fn round_trip_preserves_ordered_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut added = rule("C001", 115, "HAWK", "Education");
        added.override_rule_id = Some("E003".to_string());
        store.add_rule(added).unwrap();

        let reloaded = RuleStore::load(&dir.path().join("category_rules.csv")).unwrap();
        assert_eq!(reloaded.rules(), store.rules());
    }

    #[test]
    fn duplicate_id_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let err = store.add_rule(rule("G001", 110, "KROGER", "Groceries & Markets"));
        assert!(matches!(err, Err(StoreError::DuplicateRuleId(id)) if id == "G001"));
    }

    #[test]
    fn priority_bounds_are_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.add_rule(rule("C001", 0, "X", "Health")),
            Err(StoreError::PriorityOutOfRange(0))
        ));
        assert!(matches!(
            store.add_rule(rule("C002", 151, "X", "Health")),
            Err(StoreError::PriorityOutOfRange(151))
        ));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.add_rule(rule("C001", 100, "  ", "Health")),
            Err(StoreError::EmptyRuleField("pattern"))
        ));
    }

    #[test]
    fn override_target_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut r = rule("C001", 120, "NETFLIX", "Entertainment");
        r.override_rule_id = Some("NOPE".to_string());
        assert!(matches!(
            store.add_rule(r),
            Err(StoreError::UnknownOverrideTarget(_))
        ));
    }

    #[test]
    fn set_override_links_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_rule(rule("C001", 120, "KROGER MARKETPLACE", "Shopping & Retail")).unwrap();
        store.set_override("C001", Some("G001")).unwrap();
        assert_eq!(store.get("C001").unwrap().override_rule_id.as_deref(), Some("G001"));
        store.set_override("C001", None).unwrap();
        assert_eq!(store.get("C001").unwrap().override_rule_id, None);
        assert!(matches!(
            store.set_override("C001", Some("NOPE")),
            Err(StoreError::UnknownOverrideTarget(_))
        ));
    }

    #[test]
    fn duplicate_rule_copies_fields_under_new_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let copy = store.duplicate_rule("G001", "C100", today).unwrap();
        assert_eq!(copy.pattern, store.get("G001").unwrap().pattern);
        assert!(copy.is_custom);
        assert!(store.get("C100").is_some());
        assert!(matches!(
            store.duplicate_rule("G001", "C100", today),
            Err(StoreError::DuplicateRuleId(_))
        ));
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let removed = store.delete_rule("G001").unwrap();
        assert_eq!(removed.id, "G001");
        assert!(store.get("G001").is_none());
        assert!(matches!(
            store.delete_rule("G001"),
            Err(StoreError::RuleNotFound(_))
        ));
    }

    #[test]
    fn update_rule_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut edited = store.get("G001").unwrap().clone();
        edited.priority = 105;
        store.update_rule(edited).unwrap();
        assert_eq!(store.get("G001").unwrap().priority, 105);
        assert!(matches!(
            store.update_rule(rule("NOPE", 100, "X", "Health")),
            Err(StoreError::RuleNotFound(_))
        ));
    }

    #[test]
    fn mutation_creates_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_rule(rule("C001", 115, "HAWK", "Education")).unwrap();
        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .to_string_lossy()
                    .ends_with(".backup")
            })
            .count();
        assert!(backups >= 1);
    }

    #[test]
    fn export_custom_writes_only_user_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_rule(rule("C001", 115, "HAWK", "Education")).unwrap();
        store.add_rule(rule("C002", 112, "NETFLIX", "Entertainment")).unwrap();

        let export = dir.path().join("custom_rules.csv");
        let count = store.export_custom(&export).unwrap();
        assert_eq!(count, 2);
        let exported = RuleStore::load(&export).unwrap();
        assert!(exported.rules().iter().all(|r| r.is_custom));
        assert_eq!(exported.rules().len(), 2);
    }

    #[test]
    fn load_of_missing_file_fails_but_open_or_seed_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(RuleStore::load(&path).is_err());
        assert!(RuleStore::open_or_seed(&path).is_ok());
    }
}
