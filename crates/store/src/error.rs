use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("rule id '{0}' already exists")]
    DuplicateRuleId(String),
    #[error("rule '{0}' not found")]
    RuleNotFound(String),
    #[error("override target '{0}' does not exist")]
    UnknownOverrideTarget(String),
    #[error("priority {0} outside allowed range {min}..={max}", min = centavo_core::MIN_PRIORITY, max = centavo_core::MAX_PRIORITY)]
    PriorityOutOfRange(u32),
    #[error("rule {0} is empty")]
    EmptyRuleField(&'static str),
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("category '{0}' not found")]
    CategoryNotFound(String),
    #[error("parent category '{0}' does not exist")]
    UnknownParent(String),
    #[error("parent chain of '{0}' would form a cycle")]
    ParentCycle(String),
    #[error("'{0}' is a built-in category and cannot be deleted")]
    BuiltinCategory(String),
    #[error("category '{name}' is still referenced by {rule_count} rule(s)")]
    CategoryInUse { name: String, rule_count: usize },
}
