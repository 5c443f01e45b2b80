//! The category store: flat CSV rows defining category names, optional
//! parents, and the built-in/user-defined split.

use centavo_core::{builtin_categories, Category, Rule};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::backup::backup_and_replace;
use crate::error::StoreError;

pub struct CategoryStore {
    path: PathBuf,
    categories: Vec<Category>,
}

impl CategoryStore {
    /// Read the store, creating it from the built-in set when the file is
    /// missing so reports remain generable on a fresh installation.
    pub fn load_or_seed(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!(path = %path.display(), "category store missing, seeding built-ins");
            let store = CategoryStore {
                path: path.to_path_buf(),
                categories: builtin_categories(),
            };
            store.save()?;
            return Ok(store);
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut categories = Vec::new();
        for record in reader.deserialize() {
            categories.push(record?);
        }
        Ok(CategoryStore {
            path: path.to_path_buf(),
            categories,
        })
    }

    /// Categories in stored order — the order reports aggregate in.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Owned copy handed to the aggregator as its immutable snapshot.
    pub fn snapshot(&self) -> Vec<Category> {
        self.categories.clone()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn children(&self, parent: &str) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.parent.as_deref() == Some(parent))
            .collect()
    }

    pub fn roots(&self) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.parent.is_none()).collect()
    }

    pub fn add_category(&mut self, category: Category) -> Result<(), StoreError> {
        if self.get(&category.name).is_some() {
            return Err(StoreError::DuplicateCategory(category.name));
        }
        if let Some(parent) = &category.parent {
            if self.get(parent).is_none() {
                return Err(StoreError::UnknownParent(parent.clone()));
            }
            self.check_acyclic(&category.name, parent)?;
        }
        self.categories.push(category);
        self.save()
    }

    /// Only user-defined categories may be deleted, and only while no rule
    /// still resolves to them.
    pub fn delete_category(&mut self, name: &str, rules: &[Rule]) -> Result<Category, StoreError> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StoreError::CategoryNotFound(name.to_string()))?;
        if !self.categories[pos].is_user_defined {
            return Err(StoreError::BuiltinCategory(name.to_string()));
        }
        let rule_count = rules.iter().filter(|r| r.category == name).count();
        if rule_count > 0 {
            return Err(StoreError::CategoryInUse {
                name: name.to_string(),
                rule_count,
            });
        }
        let removed = self.categories.remove(pos);
        self.save()?;
        Ok(removed)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for category in &self.categories {
            writer.serialize(category)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        backup_and_replace(&self.path, &bytes)?;
        Ok(())
    }

    /// Walk the parent chain from `parent` upward; adding `name` must not
    /// close a loop, and a corrupt pre-existing loop must not hang the
    /// walk.
    fn check_acyclic(&self, name: &str, parent: &str) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        let mut current = Some(parent.to_string());
        while let Some(ancestor) = current {
            if ancestor == name || !seen.insert(ancestor.clone()) {
                return Err(StoreError::ParentCycle(name.to_string()));
            }
            current = self.get(&ancestor).and_then(|c| c.parent.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> CategoryStore {
        CategoryStore::load_or_seed(&dir.path().join("categories.csv")).unwrap()
    }

    fn user_cat(name: &str, parent: Option<&str>) -> Category {
        Category::user_defined(name, parent, "", today())
    }

    #[test]
    fn missing_file_is_seeded_with_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.categories().len(), 8);
        assert_eq!(store.categories()[0].name, "Groceries & Markets");
        assert!(dir.path().join("categories.csv").exists());
    }

    #[test]
    fn round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_category(user_cat("Education", Some("Entertainment"))).unwrap();
        let reloaded = CategoryStore::load_or_seed(&dir.path().join("categories.csv")).unwrap();
        assert_eq!(reloaded.categories(), store.categories());
        let education = reloaded.get("Education").unwrap();
        assert!(education.is_user_defined);
        assert_eq!(education.parent.as_deref(), Some("Entertainment"));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.add_category(user_cat("Health", None)),
            Err(StoreError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn parent_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.add_category(user_cat("Tuition", Some("Nope"))),
            Err(StoreError::UnknownParent(_))
        ));
    }

    #[test]
    fn nested_parent_chain_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_category(user_cat("Wellness", Some("Health"))).unwrap();
        store.add_category(user_cat("Supplements", Some("Wellness"))).unwrap();
        assert_eq!(
            store.get("Supplements").unwrap().parent.as_deref(),
            Some("Wellness")
        );
    }

    #[test]
    fn corrupt_parent_loop_does_not_hang_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.csv");
        // Hand-written store with a pre-existing A <-> B loop.
        std::fs::write(
            &path,
            "CategoryName,ParentCategory,Description,IsUserDefined,CreatedDate\n\
             A,B,,Yes,2026-01-01\n\
             B,A,,Yes,2026-01-01\n",
        )
        .unwrap();
        let mut store = CategoryStore::load_or_seed(&path).unwrap();
        assert!(matches!(
            store.add_category(user_cat("C", Some("A"))),
            Err(StoreError::ParentCycle(_))
        ));
    }

    #[test]
    fn builtin_categories_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.delete_category("Health", &[]),
            Err(StoreError::BuiltinCategory(_))
        ));
    }

    #[test]
    fn referenced_category_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_category(user_cat("Education", None)).unwrap();
        let rules = vec![Rule {
            id: "C001".to_string(),
            priority: 115,
            pattern: "HAWK".to_string(),
            category: "Education".to_string(),
            explanation: String::new(),
            override_rule_id: None,
            is_custom: true,
            created_date: today(),
        }];
        assert!(matches!(
            store.delete_category("Education", &rules),
            Err(StoreError::CategoryInUse { rule_count: 1, .. })
        ));
        assert!(store.delete_category("Education", &[]).is_ok());
        assert!(store.get("Education").is_none());
    }

    #[test]
    fn children_and_roots_reflect_hierarchy() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_category(user_cat("Education", Some("Entertainment"))).unwrap();
        store.add_category(user_cat("Streaming", Some("Entertainment"))).unwrap();
        let kids: Vec<_> = store.children("Entertainment").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(kids, vec!["Education", "Streaming"]);
        assert_eq!(store.roots().len(), 8);
    }
}
