//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `structgraph`.
#[derive(Debug, Parser)]
#[command(
    name = "structgraph",
    version,
    about = "Browse a project's file tree and summarize files with Gemini"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Workspace selection shared by the commands that scan.
#[derive(Debug, Clone, Args)]
pub struct RootArg {
    /// Workspace root to scan (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the project structure panel in the terminal.
    Show(RootArg),
    /// Run the panel host, exchanging JSON messages over stdin/stdout.
    Serve(RootArg),
    /// Store the Gemini API key.
    SetCredential {
        /// Read the key from the first line of stdin instead of prompting.
        #[arg(long)]
        stdin: bool,
    },
    /// Delete the stored Gemini API key.
    ClearCredential,
    /// Print the scanned file tree as JSON.
    Scan(RootArg),
    /// Print the layered graph layout as JSON.
    Layout(RootArg),
    /// Summarize one file and print the result.
    Summarize {
        /// File to summarize.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_show_with_root() {
        let cli = Cli::parse_from(["structgraph", "show", "--root", "/w"]);
        assert!(matches!(cli.command, Command::Show(ref r) if r.root == Some(PathBuf::from("/w"))));
    }

    #[test]
    fn parses_credential_commands() {
        let cli = Cli::parse_from(["structgraph", "set-credential", "--stdin"]);
        assert!(matches!(cli.command, Command::SetCredential { stdin: true }));

        let cli = Cli::parse_from(["structgraph", "clear-credential"]);
        assert!(matches!(cli.command, Command::ClearCredential));
    }

    #[test]
    fn summarize_requires_a_path() {
        assert!(Cli::try_parse_from(["structgraph", "summarize"]).is_err());
        let cli = Cli::parse_from(["structgraph", "summarize", "src/lib.rs"]);
        assert!(matches!(cli.command, Command::Summarize { ref path } if path == &PathBuf::from("src/lib.rs")));
    }
}
