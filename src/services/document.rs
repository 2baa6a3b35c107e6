// src/services/document.rs

//! README generator.
//!
//! The README template is split on a literal marker. Segments 0, 3 and 4
//! (intro, contributing, contacts) are kept as written; the table of
//! contents and the project sections between them are regenerated.

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CheckedProject, DocumentConfig};
use crate::utils::slug;

/// Minimum number of marker-delimited segments in a template.
pub const MIN_SEGMENTS: usize = 5;

const INTRO: usize = 0;
const CONTRIBUTING: usize = 3;
const CONTACTS: usize = 4;

/// Renders the project listing into a README template.
pub struct DocumentGenerator {
    config: DocumentConfig,
}

impl DocumentGenerator {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Render the full document from the template and the checked rows.
    ///
    /// `categories` sets the section order; rows keep their given order
    /// within a section.
    pub fn render(
        &self,
        template: &str,
        categories: &[String],
        rows: &[CheckedProject],
    ) -> Result<String> {
        let marker = self.config.marker.as_str();
        let segments: Vec<&str> = template.split(marker).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(AppError::template(format!(
                "expected at least {} segments separated by '{}', found {}",
                MIN_SEGMENTS,
                marker,
                segments.len()
            )));
        }

        let mut out = String::new();
        out.push_str(segments[INTRO]);
        out.push_str(marker);
        out.push_str(&self.toc(categories));
        out.push('\n');
        out.push_str(marker);
        out.push('\n');

        out.push_str("\n## Projects\n");
        for category in categories {
            out.push_str(&format!("\n### {}\n\n", category));
            for row in rows.iter().filter(|r| &r.project.category == category) {
                out.push_str(&self.project_line(row));
            }
        }
        out.push('\n');

        out.push_str(marker);
        out.push_str(segments[CONTRIBUTING]);
        out.push_str(marker);
        out.push_str(segments[CONTACTS]);
        Ok(out)
    }

    /// Table of contents: title, one entry per category, then the fixed
    /// contributing and contacts entries.
    fn toc(&self, categories: &[String]) -> String {
        let mut toc = format!(
            "\n\n- [{}](#{})\n",
            self.config.title,
            slug(&self.config.title)
        );
        for category in categories {
            toc.push_str(&format!("  - [{}](#{})\n", category, slug(category)));
        }
        toc.push_str("- [Contributing guidelines](#contributing-guidelines)\n");
        toc.push_str("- [Contacts](#contacts)\n");
        toc
    }

    fn project_line(&self, row: &CheckedProject) -> String {
        let project = &row.project;
        let icon = if row.has_problem() {
            format!("{}  ", self.config.problem_icon)
        } else {
            String::new()
        };
        let start = project
            .start_date
            .map_or_else(|| "NA".to_string(), |y| y.to_string());
        let end = project.end_date.as_deref().unwrap_or("NA");

        format!(
            "- {}[{}]({}) - {} (`{}` - `{}`)\n",
            icon,
            project.name,
            project.project_information_url.as_deref().unwrap_or(""),
            project.description.as_deref().unwrap_or(""),
            start,
            end
        )
    }
}

/// Read the current README template.
pub async fn read_template(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Replace the document atomically (write to temp, then rename).
pub async fn write_document(path: &Path, text: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Problem, Project};

    const TEMPLATE: &str = "# Awesome\n\nIntro text.\n\n<!---->old toc<!---->old projects<!---->\n## Contributing guidelines\n\nOpen a PR.\n<!---->\n## Contacts\n\nMail us.\n";

    fn row(name: &str, category: &str, problem: bool) -> CheckedProject {
        let mut project = Project::new(name, category);
        project.description = Some(format!("About {name}"));
        project.project_information_url = Some(format!("https://example.org/{name}"));
        project.start_date = Some(2019);
        CheckedProject {
            problem: problem.then(|| Problem {
                id: name.to_string(),
                url: format!("https://example.org/{name}"),
                reason: "Redirects to https://x".into(),
            }),
            project,
        }
    }

    fn categories() -> Vec<String> {
        vec!["Astronomy".into(), "Biology".into()]
    }

    #[test]
    fn test_toc_and_problem_glyph() {
        let generator = DocumentGenerator::new(DocumentConfig::default());
        let rows = vec![row("Stars", "Astronomy", true), row("Birds", "Biology", false)];
        let text = generator.render(TEMPLATE, &categories(), &rows).unwrap();

        let category_entries = text.lines().filter(|l| l.starts_with("  - [")).count();
        assert_eq!(category_entries, 2);
        assert!(text.contains("  - [Astronomy](#astronomy)\n"));
        assert!(text.contains("- [Contributing guidelines](#contributing-guidelines)\n"));
        assert!(text.contains("- [Contacts](#contacts)\n"));
        assert!(text.contains("- [Awesome Citizen Science Projects](#awesome-citizen-science-projects)\n"));

        let stars = text.lines().find(|l| l.contains("[Stars]")).unwrap();
        assert_eq!(
            stars,
            "- :x:  [Stars](https://example.org/Stars) - About Stars (`2019` - `NA`)"
        );
        let birds = text.lines().find(|l| l.contains("[Birds]")).unwrap();
        assert!(birds.starts_with("- [Birds]"));
        assert!(!birds.contains(":x:"));
    }

    #[test]
    fn test_preserves_prose_segments() {
        let generator = DocumentGenerator::new(DocumentConfig::default());
        let text = generator
            .render(TEMPLATE, &categories(), &[row("Stars", "Astronomy", false)])
            .unwrap();

        assert!(text.starts_with("# Awesome\n\nIntro text.\n\n<!---->\n\n- [Awesome"));
        assert!(text.ends_with(
            "<!---->\n## Contributing guidelines\n\nOpen a PR.\n<!---->\n## Contacts\n\nMail us.\n"
        ));
        assert!(!text.contains("old toc"));
        assert!(!text.contains("old projects"));
        assert!(text.contains("\n## Projects\n\n### Astronomy\n\n- [Stars]"));
        assert_eq!(text.matches("<!---->").count(), 4);
    }

    #[test]
    fn test_rendering_is_stable() {
        let generator = DocumentGenerator::new(DocumentConfig::default());
        let rows = vec![row("Stars", "Astronomy", false), row("Birds", "Biology", true)];
        let first = generator.render(TEMPLATE, &categories(), &rows).unwrap();
        let second = generator.render(&first, &categories(), &rows).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_start_date_renders_na() {
        let generator = DocumentGenerator::new(DocumentConfig::default());
        let mut checked = row("Stars", "Astronomy", false);
        checked.project.start_date = None;
        checked.project.end_date = Some("2024".into());
        let text = generator
            .render(TEMPLATE, &["Astronomy".to_string()], &[checked])
            .unwrap();
        assert!(text.contains("(`NA` - `2024`)"));
    }

    #[test]
    fn test_too_few_segments_is_fatal() {
        let generator = DocumentGenerator::new(DocumentConfig::default());
        let template = "intro<!---->toc<!---->projects<!---->contributing";
        let err = generator.render(template, &categories(), &[]).unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }
}
