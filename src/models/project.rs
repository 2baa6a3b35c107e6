//! Project record data structure.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_yaml::{Mapping, Value};

use crate::error::{AppError, Result};
use crate::utils::{file_id, partition_dir};

/// A citizen-science project, as stored in one record file.
///
/// Columns keep the order they were read in, so a record loaded from a file
/// or a CSV row is written back with the same key order.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name, unique within the dataset
    pub name: String,

    /// Category used as partition key
    pub category: String,

    /// Short description shown in the listing
    pub description: Option<String>,

    /// Link checked for reachability
    pub project_information_url: Option<String>,

    /// Start year
    pub start_date: Option<i64>,

    /// End date, free text
    pub end_date: Option<String>,

    /// Any other columns, carried through unchanged
    pub extra: Mapping,

    /// Column order of the source
    order: Vec<String>,
}

impl Project {
    /// Column names backed by a struct field, in default order.
    pub const FIELDS: [&'static str; 6] = [
        "name",
        "category",
        "description",
        "project_information_url",
        "start_date",
        "end_date",
    ];

    /// Create a project with only the partitioning fields set.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: None,
            project_information_url: None,
            start_date: None,
            end_date: None,
            extra: Mapping::new(),
            order: Vec::new(),
        }
    }

    /// Build a project from one row or record mapping.
    ///
    /// `name` and `category` must hold a non-empty value. Non-finite numbers
    /// count as missing values.
    pub fn from_mapping(map: Mapping) -> Result<Self> {
        let mut project = Self::new(String::new(), String::new());
        let mut name = None;
        let mut category = None;

        for (key, value) in map {
            let Some(key) = scalar_text(key) else {
                continue;
            };
            match key.as_str() {
                "name" => name = scalar_text(value),
                "category" => category = scalar_text(value),
                "description" => project.description = scalar_text(value),
                "project_information_url" => project.project_information_url = scalar_text(value),
                "start_date" => project.start_date = normalize_year(&value),
                "end_date" => project.end_date = scalar_text(value),
                other => {
                    project
                        .extra
                        .insert(Value::String(other.to_string()), present(value));
                }
            }
            if !project.order.contains(&key) {
                project.order.push(key);
            }
        }

        project.name =
            name.ok_or_else(|| AppError::validation("missing value for column 'name'"))?;
        project.category =
            category.ok_or_else(|| AppError::validation("missing value for column 'category'"))?;
        Ok(project)
    }

    /// Column names in output order.
    ///
    /// Source columns come first, in their original order, followed by any
    /// field or extra column the source did not have.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .order
            .iter()
            .filter(|c| Self::FIELDS.contains(&c.as_str()) || self.extra.contains_key(c.as_str()))
            .cloned()
            .collect();
        let missing_fields = Self::FIELDS.iter().map(|c| c.to_string());
        let missing_extra = self.extra.keys().filter_map(|k| k.as_str().map(String::from));
        for column in missing_fields.chain(missing_extra) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Filesystem-safe identifier derived from the name.
    pub fn file_id(&self) -> Result<String> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("project name is empty"));
        }
        Ok(file_id(&self.name))
    }

    /// Directory name of the category partition.
    pub fn partition(&self) -> Result<String> {
        if self.category.trim().is_empty() {
            return Err(AppError::validation(format!(
                "project '{}' has no category",
                self.name
            )));
        }
        Ok(partition_dir(&self.category))
    }

    /// The URL to probe, if one is set.
    pub fn url(&self) -> Option<&str> {
        self.project_information_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Value of a column by name, covering both fields and extra columns.
    pub fn column(&self, column: &str) -> Value {
        let text = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);
        match column {
            "name" => Value::String(self.name.clone()),
            "category" => Value::String(self.category.clone()),
            "description" => text(&self.description),
            "project_information_url" => text(&self.project_information_url),
            "start_date" => self.start_date.map_or(Value::Null, Value::from),
            "end_date" => text(&self.end_date),
            other => self.extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.description == other.description
            && self.project_information_url == other.project_information_url
            && self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.extra == other.extra
            && self.columns() == other.columns()
    }
}

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for column in &columns {
            map.serialize_entry(column, &self.column(column))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Mapping::deserialize(deserializer)?;
        Self::from_mapping(map).map_err(D::Error::custom)
    }
}

/// Normalize a year value.
///
/// Integers pass through, finite floats are truncated and numeric strings are
/// parsed. Anything else yields `None`.
pub fn normalize_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        Value::Tagged(tagged) => normalize_year(&tagged.value),
        _ => None,
    }
}

/// True for `.nan` and `.inf`, which stand for an empty cell.
fn is_non_finite(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.as_f64().is_some_and(|f| !f.is_finite()))
}

/// The value itself, or null when it stands for an empty cell.
fn present(value: Value) -> Value {
    if is_non_finite(&value) {
        Value::Null
    } else {
        value
    }
}

/// Render a scalar as plain text, or `None` for null and empty values.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        ref v if is_non_finite(v) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim_end().to_string()),
    }
}
