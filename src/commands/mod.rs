//! Command dispatch and handlers.

pub mod credential;
pub mod layout;
pub mod scan;
pub mod serve;
pub mod show;
pub mod summarize;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::adapters::live::editor::TerminalEditor;
use crate::cli::{Command, RootArg};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::panel::PanelServices;

/// Dispatch a parsed command to its handler.
///
/// When `STRUCTGRAPH_RECORD` is set, every port interaction is recorded to
/// that cassette file.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env()?;
    let ctx = match &settings.record_path {
        Some(path) => {
            debug!(path = %path.display(), "recording port traffic");
            ServiceContext::recording(path, &settings)?
        }
        None => ServiceContext::live(&settings)?,
    };
    dispatch_with_context(command, ctx, &settings)
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    match command {
        Command::Show(root) => show::run(ctx, settings, &workspace_root(root)?),
        Command::Serve(root) => serve::run(ctx, settings, &workspace_root(root)?),
        Command::SetCredential { stdin } => credential::set(&ctx, *stdin),
        Command::ClearCredential => credential::clear(&ctx),
        Command::Scan(root) => scan::run(&ctx, settings, &workspace_root(root)?),
        Command::Layout(root) => layout::run(&ctx, settings, &workspace_root(root)?),
        Command::Summarize { path } => summarize::run(&ctx, settings, &absolute(path)?),
    }
}

/// The `--root` argument as an absolute path, defaulting to the current
/// directory.
fn workspace_root(arg: &RootArg) -> Result<PathBuf, String> {
    match &arg.root {
        Some(root) => absolute(root),
        None => std::env::current_dir()
            .map_err(|e| format!("Failed to determine current directory: {e}")),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|e| format!("Invalid path {}: {e}", path.display()))
}

/// Workspace roots exposed to the panel: `root` if it is a directory.
fn workspace_roots(root: &Path) -> Vec<PathBuf> {
    if root.is_dir() {
        vec![root.to_path_buf()]
    } else {
        Vec::new()
    }
}

/// Services for a terminal-hosted panel over the workspace at `root`.
///
/// With `protocol_stdin` the terminal belongs to the message bridge and
/// foreground editors are refused.
fn panel_services(
    ctx: ServiceContext,
    settings: &Settings,
    root: &Path,
    protocol_stdin: bool,
) -> Arc<PanelServices> {
    let mut editor = TerminalEditor::new(workspace_roots(root), settings.editor.clone());
    if protocol_stdin {
        editor = editor.without_terminal();
    }
    Arc::new(PanelServices {
        ctx,
        editor: Box::new(editor),
        scan: settings.scan.clone(),
        summary: settings.summary_options(),
    })
}

/// Runs `future` to completion on a fresh current-thread runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_roots_become_absolute() {
        let root = workspace_root(&RootArg { root: Some(PathBuf::from("some/dir")) }).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("some/dir"));
    }

    #[test]
    fn only_directories_are_workspace_roots() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();

        assert_eq!(workspace_roots(dir.path()), vec![dir.path().to_path_buf()]);
        assert!(workspace_roots(&file).is_empty());
        assert!(workspace_roots(&dir.path().join("missing")).is_empty());
    }
}
