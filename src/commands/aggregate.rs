//! Aggregate command implementation.
//!
//! Load usage records, build aggregation levels and print them.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::aggregator::{AggregationResult, RangeAggregator, RangeSummary};
use crate::config::{Config, OutputFormat};
use crate::records::UsageRecord;
use crate::utils::{format_count, format_count_with_separator, summarize_names};

use super::{resolve_format, serialize};

/// One level as printed by `ipagg aggregate`
#[derive(Debug, Serialize)]
pub struct LevelReport<'a> {
    pub level: usize,
    pub ranges: &'a [RangeSummary],
}

/// Run the aggregate command
pub fn run(file: &Path, format: Option<&str>, top: bool, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let format = resolve_format(format, &config)?;

    let records = load_records(file)?;
    info!("Loaded {} records from {:?}", format_count(records.len()), file);

    let result = RangeAggregator::new(config.policy).aggregate(&records)?;
    info!(
        "Built {} aggregation levels for {}",
        result.levels.len(),
        result.version
    );

    let output = render(&result, &records, format, top, config.output.max_users)?;
    print!("{}", output);
    Ok(())
}

/// Read records from a JSON (`.json`) or YAML file
pub fn load_records(path: &Path) -> Result<Vec<UsageRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records file: {:?}", path))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse records file: {:?}", path))
    }
}

/// Render levels in the requested format
pub fn render(
    result: &AggregationResult,
    records: &[UsageRecord],
    format: OutputFormat,
    top: bool,
    max_users: usize,
) -> Result<String> {
    let reports: Vec<LevelReport> = if top {
        result
            .most_general()
            .map(|l| LevelReport {
                level: result.levels.len() - 1,
                ranges: &l.ranges,
            })
            .into_iter()
            .collect()
    } else {
        result
            .levels
            .iter()
            .enumerate()
            .map(|(level, l)| LevelReport {
                level,
                ranges: &l.ranges,
            })
            .collect()
    };

    match format {
        OutputFormat::Text => Ok(render_text(&reports, records, max_users)),
        _ => serialize(&reports, format),
    }
}

fn render_text(reports: &[LevelReport], records: &[UsageRecord], max_users: usize) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "=== Level {} ({} ranges) ===\n",
            report.level,
            report.ranges.len()
        ));
        for summary in report.ranges {
            out.push_str(&format!(
                "  {:<24} actions {:>8} / {:<8} users: {}\n",
                summary.range.canonical_string(),
                format_count_with_separator(summary.action_count),
                format_count_with_separator(summary.all_action_count),
                summarize_names(&summary.users, max_users)
            ));
            if let Some(members) = &summary.members {
                for &idx in members {
                    let record = &records[idx];
                    out.push_str(&format!(
                        "      {:<20} actions {:>8}\n",
                        record.address().canonical_string(),
                        format_count_with_separator(record.action_count())
                    ));
                }
            }
        }
        out.push('\n');
    }
    out
}
