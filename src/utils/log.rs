// src/utils/log.rs

//! Structured console helpers on top of the `log` facade.
//!
//! Provides consistent section headers and run summaries.

/// Log a header
pub fn header(title: &str) {
    log::info!("{}", "═".repeat(60));
    log::info!("  {}", title);
    log::info!("{}", "═".repeat(60));
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        sub_item(&format!("{}: {}", key, value));
    }
}
