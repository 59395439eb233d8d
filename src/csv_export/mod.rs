//! Exporting transactions as a semicolon separated CSV file.

mod document;
mod endpoint;

pub use document::{CsvExport, export_csv};
pub(crate) use endpoint::export_url;
pub use endpoint::export_transactions_endpoint;
