//! Storage abstractions for project record persistence.
//!
//! Each project lives in its own YAML file, partitioned by category:
//!
//! ## Directory Structure
//!
//! ```text
//! data/categories/
//! ├── Astronomy/
//! │   └── Sterren_tellen.yml
//! └── Biology/
//!     ├── Tuinvogeltelling.yml
//!     └── Vlinders_tellen.yml
//! ```

pub mod local;
pub mod yaml;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Project;

// Re-export for convenience
pub use local::LocalStorage;
pub use yaml::YamlStyle;

/// What an upsert did with the candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or overwritten
    Written,
    /// The stored record already matched
    Skipped,
}

/// Trait for project record storage backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write a record unless an identical one is already stored.
    async fn upsert(&self, project: &Project) -> Result<WriteOutcome>;

    /// Load every stored record.
    async fn load_all(&self) -> Result<Vec<Project>>;
}
