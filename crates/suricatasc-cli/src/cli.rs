//! CLI argument definitions for `suricatasc`.

use clap::Parser;
use suricatasc_config::Config;

use crate::command::CommandInvocation;
use crate::errors::AppError;

/// Command-line interface for the Suricata management socket.
#[derive(Parser, Debug)]
#[command(
    name = "suricatasc",
    version,
    about = "Send commands to a running Suricata engine over its unix socket"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,
    /// Opens an interactive session to send commands to the socket.
    #[arg(long)]
    pub(crate) interactive: bool,
    /// The command to send, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) command: Vec<String>,
}

/// How the process drives the session, fixed at startup.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Send a single command taken from the process arguments.
    OneShot(CommandInvocation),
    /// Read commands from standard input until shutdown.
    Interactive,
}

impl Cli {
    /// Validates the flag combination and selects the run mode.
    pub(crate) fn mode(&self) -> Result<Mode, AppError> {
        match (self.interactive, self.command.is_empty()) {
            (true, false) => Err(AppError::InteractiveWithArguments(self.command.clone())),
            (true, true) => Ok(Mode::Interactive),
            (false, _) => CommandInvocation::from_tokens(self.command.clone())
                .map(Mode::OneShot)
                .ok_or(AppError::MissingCommand),
        }
    }
}
