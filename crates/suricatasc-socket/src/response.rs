//! Response documents returned by the management socket.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SessionError;

/// Blank lines tolerated before a response is considered lost.
pub(crate) const EMPTY_LINE_LIMIT: usize = 10;

/// Outcome reported by the engine in the `return` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ReturnStatus {
    /// The command succeeded.
    #[serde(rename = "OK")]
    Ok,
    /// The engine rejected the command.
    #[serde(rename = "NOK")]
    Nok,
}

/// A decoded engine response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Response {
    #[serde(rename = "return")]
    status: ReturnStatus,
    #[serde(default)]
    message: Value,
}

impl Response {
    /// Builds a successful response carrying `message`.
    #[must_use]
    pub fn ok(message: impl Into<Value>) -> Self {
        Self {
            status: ReturnStatus::Ok,
            message: message.into(),
        }
    }

    /// Builds a rejection carrying `message`.
    #[must_use]
    pub fn rejected(message: impl Into<Value>) -> Self {
        Self {
            status: ReturnStatus::Nok,
            message: message.into(),
        }
    }

    /// Status reported by the engine.
    #[must_use]
    pub const fn status(&self) -> ReturnStatus {
        self.status
    }

    /// Raw message payload.
    #[must_use]
    pub const fn message(&self) -> &Value {
        &self.message
    }

    /// Returns true when the engine accepted the command.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ReturnStatus::Ok
    }

    /// Renders the message for display.
    ///
    /// String messages are returned verbatim; structured messages are
    /// pretty-printed as JSON.
    pub fn render(&self) -> Result<String, SessionError> {
        match &self.message {
            Value::String(text) => Ok(text.clone()),
            other => serde_json::to_string_pretty(other).map_err(SessionError::Render),
        }
    }

    /// Message text used when the response is reported as an error.
    pub(crate) fn describe(&self) -> String {
        match &self.message {
            Value::String(text) => text.clone(),
            Value::Null => String::from("no message"),
            other => other.to_string(),
        }
    }
}

/// Reads the next response line, skipping stray blank lines.
pub(crate) fn read_response<R>(reader: &mut R) -> Result<Response, SessionError>
where
    R: BufRead,
{
    let mut line = String::new();
    let mut consecutive_empty_lines = 0;

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(SessionError::ReadResponse)?;
        if read == 0 {
            return Err(SessionError::ConnectionClosed);
        }
        if line.trim().is_empty() {
            consecutive_empty_lines += 1;
            if consecutive_empty_lines >= EMPTY_LINE_LIMIT {
                return Err(SessionError::EmptyResponses {
                    limit: EMPTY_LINE_LIMIT,
                });
            }
            continue;
        }
        return serde_json::from_str(&line).map_err(SessionError::ParseResponse);
    }
}
