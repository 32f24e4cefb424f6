//! Request documents written to the management socket.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::SessionError;

#[derive(Debug, Serialize)]
pub(crate) struct VersionRequest<'a> {
    pub(crate) version: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommandRequest<'a> {
    pub(crate) command: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub(crate) arguments: Map<String, Value>,
}

/// Writes `payload` as one JSON line.
///
/// The document is encoded in memory first so that a failing writer is
/// reported as [`SessionError::SendRequest`] rather than as a serialisation
/// error.
pub(crate) fn write_jsonl<T, W>(payload: &T, writer: &mut W) -> Result<(), SessionError>
where
    T: Serialize,
    W: Write,
{
    let mut line = serde_json::to_vec(payload).map_err(SessionError::SerialiseRequest)?;
    line.push(b'\n');
    writer.write_all(&line).map_err(SessionError::SendRequest)?;
    writer.flush().map_err(SessionError::SendRequest)
}
