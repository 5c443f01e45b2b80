pub mod category;
pub mod money;
pub mod period;
pub mod rule;
pub mod transaction;
pub mod yes_no;

pub use category::{builtin_categories, Category, DEFAULT_CATEGORIES};
pub use money::Money;
pub use period::Month;
pub use rule::{seed_rules, Rule, FALLBACK_RULE_ID, MAX_PRIORITY, MIN_PRIORITY};
pub use transaction::{CategorizedTransaction, Transaction, Vendor};
