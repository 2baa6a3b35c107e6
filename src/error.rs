// src/error.rs

//! Unified error handling for the catalog tools.

use std::fmt;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML record could not be read or written
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV file could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet could not be written
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// README template does not have the expected shape
    #[error("Template error: {0}")]
    Template(String),

    /// Reachability probe failed
    #[error("Probe failed for {url}: {message}")]
    Probe { url: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a template error.
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }

    /// Create a probe error for a URL.
    pub fn probe(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Probe {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
