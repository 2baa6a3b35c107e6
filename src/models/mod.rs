// src/models/mod.rs

//! Domain models for the catalog tools.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod problem;
mod project;

// Re-export all public types
pub use config::{CheckerConfig, Config, DocumentConfig, PathsConfig};
pub use problem::{CheckRequest, CheckedProject, Problem};
pub use project::{Project, normalize_year};
