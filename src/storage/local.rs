//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── {category}/
//!     └── {file_id}.yml
//! ```
//!
//! Records are compared structurally before writing, so an unchanged row
//! never touches its file. Files are written to a `.tmp` sibling and renamed
//! into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Project;
use crate::storage::{RecordStore, WriteOutcome, YamlStyle};

const RECORD_EXTENSION: &str = "yml";
const TEMP_EXTENSION: &str = "tmp";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    style: YamlStyle,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            style: YamlStyle::default(),
        }
    }

    /// Create a LocalStorage with a custom record layout.
    pub fn with_style(root_dir: impl Into<PathBuf>, style: YamlStyle) -> Self {
        Self {
            root_dir: root_dir.into(),
            style,
        }
    }

    /// Full path of the record file for a project.
    pub fn record_path(&self, project: &Project) -> Result<PathBuf> {
        Ok(self
            .root_dir
            .join(project.partition()?)
            .join(format!("{}.{}", project.file_id()?, RECORD_EXTENSION)))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension(TEMP_EXTENSION);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read a file, returning None if it doesn't exist.
    async fn read_string(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Load the stored record at a path.
    ///
    /// Missing, empty and unparseable files all count as "no record".
    async fn read_record(&self, path: &Path) -> Result<Option<Project>> {
        let Some(text) = self.read_string(path).await? else {
            return Ok(None);
        };
        match serde_yaml::from_str::<Option<Project>>(&text) {
            Ok(record) => Ok(record),
            Err(e) => {
                log::debug!("Unreadable record {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Every record file under the root, in sorted path order.
    async fn record_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::Io(e)),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if path.extension().and_then(|e| e.to_str()) != Some(TEMP_EXTENSION) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl RecordStore for LocalStorage {
    async fn upsert(&self, project: &Project) -> Result<WriteOutcome> {
        let path = self.record_path(project)?;

        if let Some(existing) = self.read_record(&path).await? {
            if &existing == project {
                return Ok(WriteOutcome::Skipped);
            }
        }

        let text = self.style.to_document(project)?;
        self.write_bytes(&path, text.as_bytes()).await?;
        Ok(WriteOutcome::Written)
    }

    async fn load_all(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        for path in self.record_files().await? {
            match self.read_record(&path).await? {
                Some(project) => projects.push(project),
                None => log::warn!("Skipping unreadable record file {}", path.display()),
            }
        }
        log::debug!(
            "Loaded {} records from {}",
            projects.len(),
            self.root_dir.display()
        );
        Ok(projects)
    }
}
