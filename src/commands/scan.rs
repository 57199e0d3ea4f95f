//! `structgraph scan` command.

use std::path::Path;

use tracing::info;

use super::workspace_roots;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::model::{count_nodes, FileNode};
use crate::panel::NO_WORKSPACE;
use crate::scan::scan;

/// Execute the `scan` command: print the file tree of `root` as JSON.
///
/// # Errors
///
/// Returns an error string if `root` is not a directory or the tree cannot
/// be encoded.
pub fn run(ctx: &ServiceContext, settings: &Settings, root: &Path) -> Result<(), String> {
    let forest = scan_root(ctx, settings, root)?;
    let json = serde_json::to_string_pretty(&forest)
        .map_err(|e| format!("Failed to encode file tree: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Scans the workspace at `root`, which must be a directory.
pub(super) fn scan_root(
    ctx: &ServiceContext,
    settings: &Settings,
    root: &Path,
) -> Result<Vec<FileNode>, String> {
    let Some(root) = workspace_roots(root).into_iter().next() else {
        return Err(NO_WORKSPACE.to_string());
    };
    let forest = scan(ctx.fs.as_ref(), &root, &settings.scan);
    info!(root = %root.display(), nodes = count_nodes(&forest), "scan complete");
    Ok(forest)
}
