//! Core library for the `structgraph` CLI.
//!
//! Scans a workspace into a [`model::FileNode`] forest, lays it out as a
//! layered graph, and drives a single visualization panel that can open
//! files and ask Gemini for per-file summaries.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod layout;
pub mod logging;
pub mod model;
pub mod panel;
pub mod ports;
pub mod protocol;
pub mod scan;
pub mod summary;
pub mod ui;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string().trim_end().to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["structgraph", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_subcommand() {
        assert!(run(["structgraph"]).is_err());
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["structgraph", "--help"]).is_ok());
    }
}
