//! Terminal host editor.
//!
//! Notifications and progress go to stderr so stdout stays free for the
//! panel (or for protocol traffic in `serve` mode). Documents open in an
//! external editor command, launched one of two ways:
//!
//! - [`EditorLaunch::Detached`] for openers that return control at once or
//!   run in their own window (`code -r`, `xdg-open`). The child gets no
//!   stdin and is reaped once it exits.
//! - [`EditorLaunch::Foreground`] for editors that need the terminal (`vi`,
//!   `nano`). The call blocks until the editor exits, so nothing else reads
//!   the terminal meanwhile.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::config::ENV_EDITOR;
use crate::ports::{BoxError, Editor};

/// How an editor command is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorLaunch {
    /// Spawned in the background without stdin; reaped when it exits.
    Detached,
    /// Run on the current terminal; the caller waits for it to exit.
    Foreground,
}

/// A configured editor command line and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    /// Program plus optional arguments; the document path is appended.
    pub command: String,
    /// Launch mode.
    pub launch: EditorLaunch,
}

impl EditorCommand {
    /// A GUI or otherwise non-blocking opener.
    pub fn detached(command: impl Into<String>) -> Self {
        Self { command: command.into(), launch: EditorLaunch::Detached }
    }

    /// An editor that takes over the terminal.
    pub fn foreground(command: impl Into<String>) -> Self {
        Self { command: command.into(), launch: EditorLaunch::Foreground }
    }
}

/// Editor implementation for the command-line host.
pub struct TerminalEditor {
    roots: Vec<PathBuf>,
    open_command: Option<EditorCommand>,
    terminal_available: bool,
    children: Mutex<Vec<Child>>,
}

impl TerminalEditor {
    /// Creates an editor exposing `roots` as workspace folders; files open
    /// with `open_command`.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, open_command: Option<EditorCommand>) -> Self {
        Self { roots, open_command, terminal_available: true, children: Mutex::new(Vec::new()) }
    }

    /// Marks the terminal as taken (stdin carries protocol traffic), so
    /// foreground editors are refused.
    #[must_use]
    pub fn without_terminal(mut self) -> Self {
        self.terminal_available = false;
        self
    }

    /// Number of detached editor processes that have not exited yet.
    /// Exited ones are reaped on the way.
    #[must_use]
    pub fn running_children(&self) -> usize {
        let mut children = self.children.lock().unwrap_or_else(PoisonError::into_inner);
        reap(&mut children);
        children.len()
    }
}

/// Waits on every child that has exited and drops it from `children`.
fn reap(children: &mut Vec<Child>) {
    children.retain_mut(|child| match child.try_wait() {
        Ok(Some(status)) => {
            debug!(pid = child.id(), %status, "editor exited");
            false
        }
        Ok(None) => true,
        Err(e) => {
            warn!(pid = child.id(), error = %e, "could not poll editor process");
            false
        }
    });
}

impl Editor for TerminalEditor {
    fn workspace_roots(&self) -> Vec<PathBuf> {
        self.roots.clone()
    }

    fn open_document(&self, path: &Path) -> Result<(), BoxError> {
        if !path.is_file() {
            return Err(format!("{} is not a readable file", path.display()).into());
        }
        let editor = self
            .open_command
            .as_ref()
            .ok_or("no editor configured; set STRUCTGRAPH_EDITOR, VISUAL or EDITOR")?;
        let mut parts = editor.command.split_whitespace();
        let program = parts.next().ok_or("editor command is empty")?;

        let mut command = Command::new(program);
        command.args(parts).arg(path);

        match editor.launch {
            EditorLaunch::Detached => {
                info!(path = %path.display(), program, "opening document");
                let child = command.stdin(Stdio::null()).spawn()?;
                let mut children = self.children.lock().unwrap_or_else(PoisonError::into_inner);
                reap(&mut children);
                children.push(child);
                Ok(())
            }
            EditorLaunch::Foreground if !self.terminal_available => Err(format!(
                "{program} needs the terminal, which is in use; set {ENV_EDITOR} to a non-blocking opener"
            )
            .into()),
            EditorLaunch::Foreground => {
                info!(path = %path.display(), program, "editing document in the foreground");
                let status = command.status()?;
                if status.success() {
                    Ok(())
                } else {
                    Err(format!("{program} exited with {status}").into())
                }
            }
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn report_progress(&self, title: &str, percent: u8) {
        debug!(title, percent, "progress");
        eprintln!("{title} {percent}%");
    }
}

impl Drop for TerminalEditor {
    fn drop(&mut self) {
        let children = self.children.get_mut().unwrap_or_else(PoisonError::into_inner);
        reap(children);
        if !children.is_empty() {
            debug!(running = children.len(), "leaving detached editors running");
        }
    }
}
