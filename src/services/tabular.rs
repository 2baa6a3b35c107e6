// src/services/tabular.rs

//! Tabular adapter.
//!
//! Reads the flat CSV source into projects and writes projects back out as
//! CSV and XLSX with a stable column order.

use std::collections::BTreeSet;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_yaml::{Mapping, Value};

use crate::error::{AppError, Result};
use crate::models::Project;

/// Columns produced by the link checker, never written to tabular files.
pub const VALIDATOR_COLUMNS: [&str; 3] = ["icon", "url", "error"];

/// Columns read as text even when they look numeric.
const TEXT_COLUMNS: [&str; 5] = [
    "name",
    "category",
    "description",
    "project_information_url",
    "end_date",
];

/// A set of rows with their column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Project>,
}

impl Table {
    /// Build a table whose columns follow the rows' own column order, with
    /// columns unseen so far appended in first-seen order.
    pub fn from_projects(rows: Vec<Project>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for column in rows.iter().flat_map(Project::columns) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        if columns.is_empty() {
            columns = Project::FIELDS.iter().map(|c| c.to_string()).collect();
        }
        Self { columns, rows }
    }

    /// Columns that are written to tabular files.
    pub fn output_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !VALIDATOR_COLUMNS.contains(c))
            .collect()
    }
}

/// Read the CSV source into a table.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in ["name", "category"] {
        if !columns.iter().any(|c| c == required) {
            return Err(AppError::validation(format!(
                "{} is missing required column '{}'",
                path.display(),
                required
            )));
        }
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Mapping::new();
        for (column, raw) in columns.iter().zip(record.iter()) {
            row.insert(Value::String(column.clone()), infer_cell(column, raw));
        }
        let project = Project::from_mapping(row).map_err(|e| {
            AppError::validation(format!("{} row {}: {}", path.display(), line + 2, e))
        })?;
        rows.push(project);
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(Table { columns, rows })
}

/// Write a table to both the CSV and the XLSX file.
pub fn write(table: &Table, csv_path: &Path, xlsx_path: &Path) -> Result<()> {
    write_csv(table, csv_path)?;
    write_xlsx(table, xlsx_path)?;
    Ok(())
}

/// Write a table as CSV.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let columns = table.output_columns();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for project in &table.rows {
        writer.write_record(columns.iter().map(|c| cell_text(&project.column(c))))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table as a single-sheet XLSX workbook.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let columns = table.output_columns();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    for (row, project) in table.rows.iter().enumerate() {
        for (col, name) in columns.iter().enumerate() {
            write_cell(sheet, row as u32 + 1, col as u16, &project.column(name))?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Sorted, de-duplicated categories present in the rows.
pub fn distinct_categories(rows: &[Project]) -> Vec<String> {
    rows.iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Infer a typed value for a raw CSV cell.
fn infer_cell(column: &str, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if TEXT_COLUMNS.contains(&column) {
        return Value::String(raw.to_string());
    }
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// Plain text for a CSV cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(n) if n.as_f64().is_some_and(|f| !f.is_finite()) => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Tagged(tagged) => cell_text(&tagged.value),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => {}
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        other => {
            sheet.write_string(row, col, cell_text(other))?;
        }
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
