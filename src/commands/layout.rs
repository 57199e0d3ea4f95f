//! `structgraph layout` command.

use std::path::Path;

use super::scan::scan_root;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::layout::layout;

/// Execute the `layout` command: print the positioned graph of `root` as
/// JSON.
///
/// # Errors
///
/// Returns an error string if `root` is not a directory or the graph cannot
/// be encoded.
pub fn run(ctx: &ServiceContext, settings: &Settings, root: &Path) -> Result<(), String> {
    let forest = scan_root(ctx, settings, root)?;
    let graph = layout(&forest);
    let json = serde_json::to_string_pretty(&graph)
        .map_err(|e| format!("Failed to encode graph: {e}"))?;
    println!("{json}");
    Ok(())
}
