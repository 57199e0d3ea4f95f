//! Keyboard commands for the terminal front end.

use std::io::{self, BufRead, BufReader};
use std::sync::mpsc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Select the entry with this zero-based index.
    Select(usize),
    /// Generate a summary of the selected file.
    Summarize,
    /// Redraw the view.
    Refresh,
    /// Show the key help.
    Help,
    /// Close the panel.
    Quit,
}

/// Key help printed under the view.
pub const HELP: &str = "Enter a number to select an entry, s to summarize the selected file, \
r to redraw, q to quit.";

/// Parses a line of input. Entry numbers are one-based as displayed.
///
/// Returns `None` for anything unrecognized.
#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "s" | "summary" | "summarize" => return Some(Input::Summarize),
        "" | "r" | "refresh" => return Some(Input::Refresh),
        "h" | "?" | "help" => return Some(Input::Help),
        "q" | "quit" | "exit" => return Some(Input::Quit),
        _ => {}
    }
    match line.parse::<usize>() {
        Ok(number) if number > 0 => Some(Input::Select(number - 1)),
        _ => None,
    }
}

/// Reads lines from a blocking source on a helper thread, one line per
/// request.
///
/// Nothing is read until [`LineReader::next_line`] asks, so between lines
/// the terminal can belong to another process (a foreground editor).
pub struct LineReader {
    requests: mpsc::Sender<()>,
    lines: UnboundedReceiver<io::Result<Option<String>>>,
    requested: bool,
}

impl LineReader {
    /// Reads from the process's stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// Reads from `source`.
    pub fn spawn<R: BufRead + Send + 'static>(mut source: R) -> Self {
        let (requests, request_rx) = mpsc::channel::<()>();
        let (line_tx, lines) = unbounded_channel();
        std::thread::spawn(move || {
            while request_rx.recv().is_ok() {
                let mut line = String::new();
                let result = match source.read_line(&mut line) {
                    Ok(0) => Ok(None),
                    Ok(_) => Ok(Some(line.trim_end_matches(['\n', '\r']).to_string())),
                    Err(e) => Err(e),
                };
                let finished = !matches!(result, Ok(Some(_)));
                if line_tx.send(result).is_err() || finished {
                    break;
                }
            }
        });
        Self { requests, lines, requested: false }
    }

    /// Next line without its terminator; `None` at end of input.
    ///
    /// Cancel safe: a line requested by a dropped call is returned by the
    /// next one.
    ///
    /// # Errors
    ///
    /// Returns the I/O error the source reported.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        if !self.requested {
            if self.requests.send(()).is_err() {
                return Ok(None);
            }
            self.requested = true;
        }
        let line = self.lines.recv().await;
        self.requested = false;
        line.unwrap_or(Ok(None))
    }
}
