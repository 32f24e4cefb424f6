//! Client session for the Suricata management socket.
//!
//! Suricata exposes a unix-domain socket that accepts one JSON document per
//! line. A session opens the socket, negotiates the protocol version, and then
//! exchanges command requests for responses until it is closed. Positional
//! command arguments are bound to the engine's named parameters through the
//! [`catalogue`].
//!
//! Callers depend on the [`Session`] trait so the transport can be replaced in
//! tests; [`SocketSession`] is the production implementation.

pub mod catalogue;
mod error;
mod request;
mod response;
mod session;

pub use error::SessionError;
pub use response::{Response, ReturnStatus};
pub use session::{CONNECTION_TIMEOUT, PROTOCOL_VERSION, SocketSession, connect};

/// A connection able to carry management commands.
pub trait Session {
    /// Sends `command` with positional `arguments` and waits for the reply.
    ///
    /// An empty slice sends the command without arguments.
    fn send(&mut self, command: &str, arguments: &[String]) -> Result<Response, SessionError>;

    /// Closes the connection. Closing an already closed session is a no-op.
    fn close(&mut self) -> Result<(), SessionError>;
}
