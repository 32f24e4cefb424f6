//! CLI entrypoint for `suricatasc`.
//!
//! The binary delegates to [`suricatasc_cli::run`], which parses arguments,
//! connects to the engine's management socket, and drives either a single
//! command or an interactive session.

use std::io::{self, BufReader};
use std::process::ExitCode;

fn main() -> ExitCode {
    suricatasc_cli::run(
        std::env::args_os(),
        BufReader::new(io::stdin()),
        io::stdout(),
        io::stderr(),
    )
}
