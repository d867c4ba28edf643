//! Categorize command implementation.
//!
//! Split a selection into accounts, temporary accounts and IP entries, and
//! show which IP entries contain one another.

use anyhow::Result;
use std::path::Path;

use crate::config::{Config, OutputFormat};
use crate::targets::{categorize, temporary_prefix, Categorized};
use crate::utils::summarize_names;

use super::{resolve_format, serialize};

/// Run the categorize command
pub fn run(entries: &[String], format: Option<&str>, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let format = resolve_format(format, &config)?;

    let categorized = categorize(entries, temporary_prefix(&config.temporary_account_prefix));
    let output = match format {
        OutputFormat::Text => render_text(&categorized, config.output.max_users),
        _ => serialize(&categorized, format)?,
    };
    print!("{}", output);
    Ok(())
}

fn render_text(categorized: &Categorized, max_users: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Users ({}): {}\n",
        categorized.users.len(),
        summarize_names(&categorized.users, max_users)
    ));
    out.push_str(&format!(
        "Temporary accounts ({}): {}\n",
        categorized.temporary_users.len(),
        summarize_names(&categorized.temporary_users, max_users)
    ));
    out.push_str(&format!("IP entries ({}):\n", categorized.ip_entries.len()));
    for entry in &categorized.ip_entries {
        out.push_str(&format!("  {}", entry.address.canonical_string()));
        if !entry.covers.is_empty() {
            out.push_str(&format!("  covers: {}", entry.covers.join(", ")));
        }
        if !entry.covered_by.is_empty() {
            out.push_str(&format!("  covered by: {}", entry.covered_by.join(", ")));
        }
        out.push('\n');
    }
    out
}
