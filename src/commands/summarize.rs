//! `structgraph summarize` command.

use std::path::Path;

use super::block_on;
use crate::adapters::live::editor::TerminalEditor;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::ports::Editor;
use crate::summary::{summarize, PROGRESS_TITLE};

/// Execute the `summarize` command: print the model's summary of `path`.
///
/// Progress is reported on stderr; only the summary goes to stdout.
///
/// # Errors
///
/// Returns the user-facing message of the failure.
pub fn run(ctx: &ServiceContext, settings: &Settings, path: &Path) -> Result<(), String> {
    let editor = TerminalEditor::new(Vec::new(), None);
    let options = settings.summary_options();

    let summary = block_on(summarize(ctx, path, &options, |step| {
        editor.report_progress(PROGRESS_TITLE, step.percent());
    }))?
    .map_err(|e| e.user_message())?;

    println!("{summary}");
    Ok(())
}
