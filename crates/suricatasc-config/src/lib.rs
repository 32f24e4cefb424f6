//! Shared configuration for the `suricatasc` command-line client.
//!
//! The configuration is expressed as a `clap` argument group so the CLI can
//! flatten it into its own parser while each option remains overridable from
//! the environment. Defaults live in [`defaults`] and the socket preflight in
//! [`socket`].

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;

pub mod defaults;
pub mod logging;
pub mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SOCKET_PATH, default_log_filter, default_log_format,
    default_socket_path,
};
pub use logging::LogFormat;
pub use socket::{SocketPathError, verify_socket_path};

/// Environment variable overriding `--socket`.
pub const SOCKET_ENV: &str = "SURICATASC_SOCKET";
/// Environment variable overriding `--log-filter`.
pub const LOG_FILTER_ENV: &str = "SURICATASC_LOG_FILTER";
/// Environment variable overriding `--log-format`.
pub const LOG_FORMAT_ENV: &str = "SURICATASC_LOG_FORMAT";

/// Options shared by every `suricatasc` invocation.
///
/// Precedence follows `clap`: an explicit flag wins over the environment,
/// which wins over the built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Full path to the Suricata unix socket.
    #[arg(
        long = "socket",
        value_name = "PATH",
        env = SOCKET_ENV,
        default_value = DEFAULT_SOCKET_PATH
    )]
    pub socket: Utf8PathBuf,
    /// Tracing filter expression applied to diagnostics on stderr.
    #[arg(
        long = "log-filter",
        value_name = "FILTER",
        env = LOG_FILTER_ENV,
        default_value = DEFAULT_LOG_FILTER
    )]
    pub log_filter: String,
    /// Diagnostic output format (`compact` or `json`).
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        env = LOG_FORMAT_ENV,
        default_value_t = default_log_format()
    )]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket: default_socket_path(),
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Path of the management socket.
    #[must_use]
    pub fn socket(&self) -> &Utf8Path {
        self.socket.as_path()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Diagnostic output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checks that the configured socket path exists and is a socket.
    pub fn verify_socket(&self) -> Result<(), SocketPathError> {
        verify_socket_path(self.socket())
    }
}
