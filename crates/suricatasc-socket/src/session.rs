//! Unix socket session with the engine.

use std::io::{self, BufReader};
use std::net::Shutdown;
use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream;
use std::time::Duration;

use camino::Utf8Path;
use socket2::{Domain, SockAddr, Socket, Type};
use tracing::{debug, info};

use crate::catalogue::bind_arguments;
use crate::request::{CommandRequest, VersionRequest, write_jsonl};
use crate::response::read_response;
use crate::{Response, Session, SessionError};

/// Protocol version announced during the handshake.
pub const PROTOCOL_VERSION: &str = "0.2";

/// Upper bound on establishing the connection.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

const SESSION_TARGET: &str = "suricatasc::session";

/// A negotiated connection to the management socket.
#[derive(Debug)]
pub struct SocketSession {
    reader: BufReader<UnixStream>,
    closed: bool,
}

/// Connects to the socket at `path` and negotiates the protocol version.
pub fn connect(path: &Utf8Path) -> Result<SocketSession, SessionError> {
    let stream = connect_unix(path).map_err(|source| SessionError::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    let session = SocketSession::negotiate(stream)?;
    info!(target: SESSION_TARGET, socket = %path, "connected to engine");
    Ok(session)
}

fn connect_unix(path: &Utf8Path) -> io::Result<UnixStream> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path.as_std_path())?;
    socket.connect_timeout(&address, CONNECTION_TIMEOUT)?;
    Ok(UnixStream::from(OwnedFd::from(socket)))
}

impl SocketSession {
    /// Performs the version handshake over an already connected stream.
    pub fn negotiate(stream: UnixStream) -> Result<Self, SessionError> {
        let mut session = Self {
            reader: BufReader::new(stream),
            closed: false,
        };
        write_jsonl(
            &VersionRequest {
                version: PROTOCOL_VERSION,
            },
            session.reader.get_mut(),
        )?;
        let reply = read_response(&mut session.reader)?;
        if !reply.is_ok() {
            return Err(SessionError::Handshake {
                version: PROTOCOL_VERSION.to_owned(),
                message: reply.describe(),
            });
        }
        debug!(target: SESSION_TARGET, version = PROTOCOL_VERSION, "protocol negotiated");
        Ok(session)
    }

    /// Returns true once [`Session::close`] has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Session for SocketSession {
    fn send(&mut self, command: &str, arguments: &[String]) -> Result<Response, SessionError> {
        if self.closed {
            return Err(SessionError::SessionClosed);
        }
        let request = CommandRequest {
            command,
            arguments: bind_arguments(command, arguments)?,
        };
        write_jsonl(&request, self.reader.get_mut())?;
        let response = read_response(&mut self.reader)?;
        debug!(
            target: SESSION_TARGET,
            command,
            ok = response.is_ok(),
            "response received"
        );
        if response.is_ok() {
            Ok(response)
        } else {
            Err(SessionError::Rejected {
                command: command.to_owned(),
                message: response.describe(),
            })
        }
    }

    fn close(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.reader.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The engine may already have dropped its end.
            Err(error) if error.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(error) => Err(SessionError::Shutdown(error)),
        }
    }
}
