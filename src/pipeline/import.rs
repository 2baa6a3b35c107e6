// src/pipeline/import.rs

//! CSV → record files.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::services::tabular;
use crate::storage::{RecordStore, WriteOutcome};
use crate::utils::log::{header, summary};

/// Per-row outcome of an import run.
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Categories in the order they were processed
    pub categories: Vec<String>,
    /// Project name and what happened to its record
    pub outcomes: Vec<(String, WriteOutcome)>,
}

impl ImportSummary {
    pub fn written(&self) -> usize {
        self.count(WriteOutcome::Written)
    }

    pub fn skipped(&self) -> usize {
        self.count(WriteOutcome::Skipped)
    }

    fn count(&self, outcome: WriteOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Convert every CSV row into its record file, skipping unchanged rows.
pub async fn run_import(
    config: &Config,
    root: &Path,
    store: &dyn RecordStore,
) -> Result<ImportSummary> {
    header("Converting CSV rows to YAML records");

    let csv_path = config.csv_path(root);
    let table = tabular::read_csv(&csv_path)?;
    log::info!("Loaded {} rows from {}", table.rows.len(), csv_path.display());

    let categories = tabular::distinct_categories(&table.rows);
    let mut outcomes = Vec::with_capacity(table.rows.len());

    for category in &categories {
        for project in table.rows.iter().filter(|p| &p.category == category) {
            let outcome = store.upsert(project).await?;
            match outcome {
                WriteOutcome::Written => log::info!("Wrote {} / {}", category, project.name),
                WriteOutcome::Skipped => log::debug!("Unchanged {} / {}", category, project.name),
            }
            outcomes.push((project.name.clone(), outcome));
        }
    }

    let result = ImportSummary {
        categories,
        outcomes,
    };
    summary(
        "Import complete",
        &[
            ("Categories", result.categories.len().to_string()),
            ("Written", result.written().to_string()),
            ("Skipped", result.skipped().to_string()),
        ],
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    const CSV: &str = "\
name,category,description,project_information_url,start_date,end_date
Sterren tellen,Astronomy,Count stars,https://example.org/sterren,2021,
Vlinders tellen,Biology,Count butterflies,https://example.org/vlinders,2020.0,2023
Tuinvogeltelling,Biology,Count birds,https://example.org/vogels,,
";

    fn setup() -> (TempDir, Config, LocalStorage) {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let csv_path = config.csv_path(tmp.path());
        std::fs::create_dir_all(csv_path.parent().unwrap()).unwrap();
        std::fs::write(&csv_path, CSV).unwrap();
        let store = LocalStorage::new(config.records_path(tmp.path()));
        (tmp, config, store)
    }

    #[tokio::test]
    async fn test_import_partitions_by_category() {
        let (tmp, config, store) = setup();
        let result = run_import(&config, tmp.path(), &store).await.unwrap();

        assert_eq!(result.categories, vec!["Astronomy", "Biology"]);
        assert_eq!(result.written(), 3);
        let records = config.records_path(tmp.path());
        assert!(records.join("Astronomy/Sterren_tellen.yml").is_file());
        assert!(records.join("Biology/Vlinders_tellen.yml").is_file());
        assert!(records.join("Biology/Tuinvogeltelling.yml").is_file());

        let stored = std::fs::read_to_string(records.join("Biology/Vlinders_tellen.yml")).unwrap();
        assert!(stored.contains("start_date: 2020\n"));
    }

    #[tokio::test]
    async fn test_import_twice_writes_nothing() {
        let (tmp, config, store) = setup();
        run_import(&config, tmp.path(), &store).await.unwrap();

        let second = run_import(&config, tmp.path(), &store).await.unwrap();
        assert_eq!(second.written(), 0);
        assert_eq!(second.skipped(), 3);
    }

    #[tokio::test]
    async fn test_import_rewrites_only_changed_rows() {
        let (tmp, config, store) = setup();
        run_import(&config, tmp.path(), &store).await.unwrap();

        let changed = CSV.replace("Count birds", "Count garden birds");
        std::fs::write(config.csv_path(tmp.path()), changed).unwrap();

        let second = run_import(&config, tmp.path(), &store).await.unwrap();
        assert_eq!(second.written(), 1);
        assert!(
            second
                .outcomes
                .contains(&("Tuinvogeltelling".to_string(), WriteOutcome::Written))
        );
    }

    #[tokio::test]
    async fn test_import_missing_csv_fails() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let store = LocalStorage::new(config.records_path(tmp.path()));
        assert!(run_import(&config, tmp.path(), &store).await.is_err());
    }
}
