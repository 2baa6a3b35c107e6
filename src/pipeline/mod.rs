//! Pipeline entry points for catalog operations.
//!
//! - `run_import`: Convert CSV rows into per-project YAML records
//! - `run_publish`: Rebuild CSV, XLSX and README from the records

pub mod import;
pub mod publish;

pub use import::{ImportSummary, run_import};
pub use publish::{PublishSummary, run_publish};
