use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A spending category. `parent` is organizational only — it groups
/// categories for display and never affects rule matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "CategoryName")]
    pub name: String,
    #[serde(rename = "ParentCategory")]
    pub parent: Option<String>,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "IsUserDefined", with = "crate::yes_no")]
    pub is_user_defined: bool,
    #[serde(rename = "CreatedDate")]
    pub created_date: NaiveDate,
}

impl Category {
    pub fn user_defined(name: &str, parent: Option<&str>, description: &str, today: NaiveDate) -> Self {
        Category {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            description: if description.is_empty() {
                format!("{name} transactions")
            } else {
                description.to_string()
            },
            is_user_defined: true,
            created_date: today,
        }
    }
}

/// Built-in categories: `(name, description)`. These exist at first run and
/// are never deleted. Their order is the default report order.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Groceries & Markets", "Fresh food and grocery shopping"),
    ("Restaurants & Food", "Dining out and food delivery"),
    ("Shopping & Retail", "General shopping and retail stores"),
    ("Auto & Gas", "Vehicle fuel and gas stations"),
    ("Utilities Bills & Insurance", "Monthly bills and insurance payments"),
    ("Entertainment", "Movies, shows, and entertainment"),
    ("Health", "Healthcare and medical services"),
    ("Home & Services", "Home improvement and services"),
];

pub fn builtin_categories() -> Vec<Category> {
    let seeded = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid seed date");
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, description)| Category {
            name: (*name).to_string(),
            parent: None,
            description: (*description).to_string(),
            is_user_defined: false,
            created_date: seeded,
        })
        .collect()
}
