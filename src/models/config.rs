//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::storage::YamlStyle;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset file locations, relative to the dataset root
    #[serde(default)]
    pub paths: PathsConfig,

    /// Link checking behavior
    #[serde(default)]
    pub checker: CheckerConfig,

    /// README generation settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Pretty-print settings for record files
    #[serde(default)]
    pub records: YamlStyle,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.checker.user_agent.trim().is_empty() {
            return Err(AppError::config("checker.user_agent is empty"));
        }
        if self.checker.timeout_secs == 0 {
            return Err(AppError::config("checker.timeout_secs must be > 0"));
        }
        if self.checker.max_concurrent == 0 {
            return Err(AppError::config("checker.max_concurrent must be > 0"));
        }
        if self.document.marker.is_empty() {
            return Err(AppError::config("document.marker is empty"));
        }
        if self.paths.records_dir.trim().is_empty() {
            return Err(AppError::config("paths.records_dir is empty"));
        }
        self.records.validate()
    }

    pub fn csv_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.csv_file)
    }

    pub fn xlsx_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.xlsx_file)
    }

    pub fn records_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.records_dir)
    }

    pub fn readme_path(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.readme_file)
    }
}

/// Dataset file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Tabular source, also regenerated from the records
    #[serde(default = "defaults::csv_file")]
    pub csv_file: String,

    /// Spreadsheet copy of the tabular file
    #[serde(default = "defaults::xlsx_file")]
    pub xlsx_file: String,

    /// Root of the per-category record directories
    #[serde(default = "defaults::records_dir")]
    pub records_dir: String,

    /// Listing document, rewritten in place
    #[serde(default = "defaults::readme_file")]
    pub readme_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            csv_file: defaults::csv_file(),
            xlsx_file: defaults::xlsx_file(),
            records_dir: defaults::records_dir(),
            readme_file: defaults::readme_file(),
        }
    }
}

/// Link checker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// User-Agent header for probe requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum probes in flight
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Redirect hops followed before giving up
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,

    /// Accept self-signed and otherwise invalid certificates
    #[serde(default = "defaults::accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            max_redirects: defaults::max_redirects(),
            accept_invalid_certs: defaults::accept_invalid_certs(),
        }
    }
}

/// README generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Literal token separating template segments
    #[serde(default = "defaults::marker")]
    pub marker: String,

    /// Glyph prefixed to projects with a link problem
    #[serde(default = "defaults::problem_icon")]
    pub problem_icon: String,

    /// Title of the table of contents root entry
    #[serde(default = "defaults::title")]
    pub title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            marker: defaults::marker(),
            problem_icon: defaults::problem_icon(),
            title: defaults::title(),
        }
    }
}

mod defaults {
    // Path defaults
    pub fn csv_file() -> String {
        "data/citizen-science-projects-nl.csv".into()
    }
    pub fn xlsx_file() -> String {
        "data/citizen-science-projects-nl.xlsx".into()
    }
    pub fn records_dir() -> String {
        "data/categories".into()
    }
    pub fn readme_file() -> String {
        "README.md".into()
    }

    // Checker defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; catalog/0.1)".into()
    }
    pub fn timeout() -> u64 {
        25
    }
    pub fn max_concurrent() -> usize {
        20
    }
    pub fn max_redirects() -> usize {
        10
    }
    pub fn accept_invalid_certs() -> bool {
        true
    }

    // Document defaults
    pub fn marker() -> String {
        "<!---->".into()
    }
    pub fn problem_icon() -> String {
        ":x:".into()
    }
    pub fn title() -> String {
        "Awesome Citizen Science Projects".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.checker.max_concurrent = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_record_layout() {
        let mut config = Config::default();
        config.records.sequence_indent = 1;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_empty_marker() {
        let mut config = Config::default();
        config.document.marker.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [checker]
            max_concurrent = 4

            [paths]
            readme_file = "docs/LIST.md"
            "#,
        )
        .unwrap();

        assert_eq!(config.checker.max_concurrent, 4);
        assert_eq!(config.checker.timeout_secs, 25);
        assert_eq!(config.paths.readme_file, "docs/LIST.md");
        assert_eq!(config.paths.records_dir, "data/categories");
        assert_eq!(config.document.marker, "<!---->");
        assert_eq!(config.records.sequence_indent, 4);
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.checker.timeout_secs, 25);
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = Config::default();
        let root = Path::new("/data/set");
        assert_eq!(
            config.records_path(root),
            PathBuf::from("/data/set/data/categories")
        );
        assert_eq!(config.readme_path(root), PathBuf::from("/data/set/README.md"));
    }
}
