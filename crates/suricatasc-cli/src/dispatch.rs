//! Forwards one invocation to the session and renders the reply.

use suricatasc_socket::Session;

use crate::command::CommandInvocation;
use crate::errors::AppError;

/// Sends `invocation` over `session` and returns the text to print.
///
/// Commands without arguments are sent with an empty argument list; the
/// session decides how (and whether) positional arguments are named.
pub(crate) fn dispatch<S>(session: &mut S, invocation: &CommandInvocation) -> Result<String, AppError>
where
    S: Session + ?Sized,
{
    let response = session
        .send(invocation.command(), invocation.arguments())
        .map_err(AppError::Dispatch)?;
    response.render().map_err(AppError::Dispatch)
}
