//! Error surface of the management socket session.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while talking to the management socket.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The socket could not be reached.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        /// Socket path that was dialled.
        path: Utf8PathBuf,
        /// Underlying connection failure.
        #[source]
        source: io::Error,
    },
    /// The engine refused the protocol version.
    #[error("engine refused protocol version {version}: {message}")]
    Handshake {
        /// Version that was offered.
        version: String,
        /// Explanation returned by the engine.
        message: String,
    },
    /// A request document could not be encoded.
    #[error("failed to serialise request: {0}")]
    SerialiseRequest(#[source] serde_json::Error),
    /// Writing a request to the socket failed.
    #[error("failed to send request: {0}")]
    SendRequest(#[source] io::Error),
    /// Reading a response from the socket failed.
    #[error("failed to read response: {0}")]
    ReadResponse(#[source] io::Error),
    /// A response line was not a valid reply document.
    #[error("failed to parse response: {0}")]
    ParseResponse(#[source] serde_json::Error),
    /// The engine hung up before replying.
    #[error("engine closed the connection")]
    ConnectionClosed,
    /// Too many blank lines arrived in place of a reply.
    #[error("received {limit} consecutive empty lines from the engine")]
    EmptyResponses {
        /// Number of blank lines tolerated.
        limit: usize,
    },
    /// The session was used after `close`.
    #[error("session is already closed")]
    SessionClosed,
    /// Shutting the connection down failed.
    #[error("failed to close connection: {0}")]
    Shutdown(#[source] io::Error),
    /// The engine answered `NOK`.
    #[error("command '{command}' failed: {message}")]
    Rejected {
        /// Command that was rejected.
        command: String,
        /// Message returned by the engine.
        message: String,
    },
    /// A required argument was not supplied.
    #[error("command '{command}' requires argument '{argument}'")]
    MissingArgument {
        /// Command being bound.
        command: String,
        /// Name of the absent argument.
        argument: &'static str,
    },
    /// More tokens were supplied than the command accepts.
    #[error("command '{command}' takes at most {expected} argument(s), got {received}")]
    TooManyArguments {
        /// Command being bound.
        command: String,
        /// Positional capacity of the command.
        expected: usize,
        /// Tokens supplied.
        received: usize,
    },
    /// Tokens were supplied to a command without parameters.
    #[error("command '{command}' does not take arguments")]
    UnexpectedArguments {
        /// Command being bound.
        command: String,
    },
    /// An integer argument did not parse.
    #[error("argument '{argument}' of '{command}' must be an integer, got '{value}'")]
    InvalidInteger {
        /// Command being bound.
        command: String,
        /// Name of the argument.
        argument: &'static str,
        /// Token as typed.
        value: String,
    },
    /// A boolean argument did not parse.
    #[error("argument '{argument}' of '{command}' must be true or false, got '{value}'")]
    InvalidSwitch {
        /// Command being bound.
        command: String,
        /// Name of the argument.
        argument: &'static str,
        /// Token as typed.
        value: String,
    },
    /// The reply could not be rendered for display.
    #[error("failed to render response: {0}")]
    Render(#[source] serde_json::Error),
}

impl SessionError {
    /// Returns true when the error leaves the connection unusable.
    ///
    /// Rejections, argument errors and rendering failures concern a single
    /// command; every other variant means no further command can be sent.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. }
                | Self::Handshake { .. }
                | Self::SendRequest(_)
                | Self::ReadResponse(_)
                | Self::ParseResponse(_)
                | Self::ConnectionClosed
                | Self::EmptyResponses { .. }
                | Self::SessionClosed
                | Self::Shutdown(_)
        )
    }
}
