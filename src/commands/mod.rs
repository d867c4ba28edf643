//! CLI command implementations.

pub mod aggregate;
pub mod categorize;
pub mod init;
pub mod reduce;

use anyhow::Result;
use serde::Serialize;

use crate::config::{Config, OutputFormat};

/// Pick the output format from the command-line flag, else the config file
pub(crate) fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(format) => format.parse().map_err(|e: String| anyhow::anyhow!(e)),
        None => Ok(config.output.format),
    }
}

/// Serialize a report as JSON or YAML
pub(crate) fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        _ => {
            let mut json = serde_json::to_string_pretty(value)?;
            json.push('\n');
            Ok(json)
        }
    }
}
