// src/pipeline/publish.rs

//! Record files → CSV, XLSX and README.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::models::{CheckRequest, CheckedProject, Config, Problem, Project};
use crate::services::{
    DocumentGenerator, LinkChecker, Table, read_template, tabular, write_document,
};
use crate::storage::RecordStore;
use crate::utils::log::{header, sub_item, summary};

/// Outcome of a publish run.
#[derive(Debug, Default)]
pub struct PublishSummary {
    pub records: usize,
    pub categories: Vec<String>,
    pub problems: Vec<Problem>,
}

/// Rebuild the tabular files and the README from the record files.
///
/// The README is rendered before anything is written, so a malformed
/// template leaves every output untouched.
pub async fn run_publish(
    config: &Config,
    root: &Path,
    store: &dyn RecordStore,
    checker: &LinkChecker,
) -> Result<PublishSummary> {
    header("Converting YAML records to CSV and README");

    let mut projects = store.load_all().await?;
    projects.sort_by(|a, b| a.category.cmp(&b.category));
    log::info!("Loaded {} records", projects.len());

    let requests = check_requests(&projects);
    log::info!("Checking {} project links...", requests.len());
    let problems = checker.check(requests).await;

    let categories = tabular::distinct_categories(&projects);
    let rows = merge_problems(projects, &problems);

    let readme_path = config.readme_path(root);
    let template = read_template(&readme_path).await?;
    let document =
        DocumentGenerator::new(config.document.clone()).render(&template, &categories, &rows)?;

    let records = rows.len();
    let table = Table::from_projects(rows.into_iter().map(|r| r.project).collect());
    let csv_path = config.csv_path(root);
    let xlsx_path = config.xlsx_path(root);
    tabular::write(&table, &csv_path, &xlsx_path)?;
    log::info!(
        "Wrote {} rows to {} and {}",
        records,
        csv_path.display(),
        xlsx_path.display()
    );

    write_document(&readme_path, &document).await?;
    log::info!("Updated {}", readme_path.display());

    for problem in &problems {
        sub_item(&format!("{} ({}): {}", problem.id, problem.url, problem.reason));
    }
    summary(
        "Publish complete",
        &[
            ("Records", records.to_string()),
            ("Categories", categories.len().to_string()),
            ("Link problems", problems.len().to_string()),
        ],
    );

    Ok(PublishSummary {
        records,
        categories,
        problems,
    })
}

/// Link check requests for every project with a URL.
fn check_requests(projects: &[Project]) -> Vec<CheckRequest> {
    projects
        .iter()
        .filter_map(|p| {
            p.url().map(|url| CheckRequest {
                id: p.name.clone(),
                url: url.to_string(),
            })
        })
        .collect()
}

/// Attach problems to projects by identifier; unmatched projects get none.
fn merge_problems(projects: Vec<Project>, problems: &[Problem]) -> Vec<CheckedProject> {
    let mut by_id: HashMap<&str, &Problem> = HashMap::new();
    for problem in problems {
        by_id.entry(problem.id.as_str()).or_insert(problem);
    }

    projects
        .into_iter()
        .map(|project| CheckedProject {
            problem: by_id.get(project.name.as_str()).map(|p| (*p).clone()),
            project,
        })
        .collect()
}
