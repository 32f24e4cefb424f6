//! Error types for the CLI runtime.

use std::io;

use suricatasc_config::SocketPathError;
use suricatasc_socket::SessionError;
use thiserror::Error;

use crate::shutdown::ShutdownError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("--interactive cannot be combined with a command: {}", .0.join(" "))]
    InteractiveWithArguments(Vec<String>),
    #[error("a command must be provided unless --interactive is set")]
    MissingCommand,
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    SocketPath(#[from] SocketPathError),
    #[error(transparent)]
    Connect(SessionError),
    #[error("failed to install shutdown handling: {0}")]
    Shutdown(#[from] ShutdownError),
    #[error(transparent)]
    Dispatch(SessionError),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}

impl AppError {
    /// Whether an interactive session may carry on after this error.
    ///
    /// Engine rejections and argument mistakes are recoverable; a broken
    /// connection is not.
    pub(crate) const fn is_recoverable(&self) -> bool {
        match self {
            Self::Dispatch(error) => !error.is_transport(),
            _ => false,
        }
    }
}
