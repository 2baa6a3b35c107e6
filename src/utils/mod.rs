//! Utility functions and helpers.

pub mod http;
pub mod log;

/// Map a project name to a filesystem-safe file identifier.
pub fn file_id(name: &str) -> String {
    name.replace([' ', '/', '\\'], "_")
}

/// Map a category to its partition directory name.
pub fn partition_dir(category: &str) -> String {
    category.replace(['/', '\\'], "_")
}

/// GitHub-style heading anchor for a title.
pub fn slug(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
