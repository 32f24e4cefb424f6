//! Built-in defaults applied when neither a flag nor the environment
//! provides a value.

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Socket path used by a stock Suricata installation.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/suricata/suricata-command.socket";

/// Default log filter expression.
///
/// Diagnostics share stderr with engine errors, so only warnings surface
/// unless the operator asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default socket path as an owned value.
#[must_use]
pub fn default_socket_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SOCKET_PATH)
}

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
