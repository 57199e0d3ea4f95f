//! Binary entrypoint for the `structgraph` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    structgraph::logging::init();
    // Recording is handled in commands::dispatch via STRUCTGRAPH_RECORD=<file>.
    match structgraph::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
