//! Dataset source parsers

pub mod sales_csv;

pub use sales_csv::SalesCsvParser;

use crate::types::{Dataset, Result, SalesRecord};
use std::path::Path;

/// A source that can turn a file into sales records
pub trait SourceParser: Send + Sync {
    /// Parser identifier (e.g., "sales-csv")
    fn name(&self) -> &str;

    /// Parse every record in a file, failing on the first malformed row
    fn parse_file(&self, path: &Path) -> Result<Vec<SalesRecord>>;

    /// Load a file into an immutable dataset, stamped with the load time
    fn load(&self, path: &Path) -> Result<Dataset> {
        let records = self.parse_file(path)?;
        Ok(Dataset::new(records).with_source(path.to_path_buf()))
    }
}
