//! Service layer for the catalog tools.
//!
//! This module contains the business logic for:
//! - CSV and XLSX conversion (`tabular`)
//! - Link checking (`LinkChecker`)
//! - README rendering (`DocumentGenerator`)

mod document;
mod links;
pub mod tabular;

pub use document::{DocumentGenerator, MIN_SEGMENTS, read_template, write_document};
pub use links::{HttpProber, LinkChecker, ProbeResponse, Prober};
pub use tabular::Table;
