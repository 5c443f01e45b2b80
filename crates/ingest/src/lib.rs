pub mod layout;
pub mod statement;

pub use layout::{ColumnLayout, Delimiter};
pub use statement::{
    ingest, ingest_file, IngestError, IngestOptions, INCOME_TRANSFER_KEYWORDS,
};
