//! Preflight checks for the management socket path.
//!
//! A missing or mistyped path is treated as a configuration error so the
//! operator sees it before any connection attempt is made.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Ensures `path` names an existing unix-domain socket.
pub fn verify_socket_path(path: &Utf8Path) -> Result<(), SocketPathError> {
    let metadata = match fs::metadata(path.as_std_path()) {
        Ok(metadata) => metadata,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            return Err(SocketPathError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(SocketPathError::Inspect {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if is_socket(&metadata) {
        Ok(())
    } else {
        Err(SocketPathError::NotASocket {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
fn is_socket(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;
    metadata.file_type().is_socket()
}

#[cfg(not(unix))]
fn is_socket(_metadata: &fs::Metadata) -> bool {
    false
}

/// Errors raised while checking the socket path.
#[derive(Debug, Error)]
pub enum SocketPathError {
    /// Nothing exists at the configured path.
    #[error("socket path '{path}' does not exist; is Suricata running with unix-command enabled?")]
    Missing {
        /// Configured socket path.
        path: Utf8PathBuf,
    },
    /// The path exists but is not a unix-domain socket.
    #[error("'{path}' is not a unix socket")]
    NotASocket {
        /// Configured socket path.
        path: Utf8PathBuf,
    },
    /// The path could not be inspected.
    #[error("failed to inspect socket path '{path}': {source}")]
    Inspect {
        /// Configured socket path.
        path: Utf8PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}
