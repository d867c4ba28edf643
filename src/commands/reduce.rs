//! Reduce command implementation.

use anyhow::Result;
use tracing::debug;

use crate::targets::reduce;

/// Print the selection with covered addresses and ranges removed
pub fn run(entries: &[String]) -> Result<()> {
    let reduced = reduce(entries);
    debug!("Reduced {} entries to {}", entries.len(), reduced.len());
    for entry in &reduced {
        println!("{}", entry);
    }
    Ok(())
}
