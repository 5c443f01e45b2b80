pub mod backup;
pub mod categories;
pub mod context;
pub mod error;
pub mod rules;

pub use categories::CategoryStore;
pub use context::context_text;
pub use error::StoreError;
pub use rules::RuleStore;
