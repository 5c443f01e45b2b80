pub mod aggregate;
pub mod categorize;
pub mod normalize;

pub use aggregate::{aggregate, large_transactions, CategoryTotal, SpendingSummary, VendorTotal};
pub use categorize::Categorizer;
pub use normalize::{NormalizerError, VendorNormalizer, DEFAULT_VENDOR_PATTERNS};
