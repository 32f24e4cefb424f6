//! Unit and behavioural tests for the CLI runtime.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use mockall::mock;
use suricatasc_socket::{Response, Session, SessionError};

mock! {
    pub(crate) EngineSession {}
    impl Session for EngineSession {
        fn send(&mut self, command: &str, arguments: &[String]) -> Result<Response, SessionError>;
        fn close(&mut self) -> Result<(), SessionError>;
    }
}

/// Commands observed by a mocked session, in send order.
#[derive(Clone, Default)]
pub(crate) struct SentCommands(Arc<Mutex<Vec<Vec<String>>>>);

impl SentCommands {
    fn record(&self, command: &str, arguments: &[String]) {
        let mut entry = vec![command.to_owned()];
        entry.extend(arguments.iter().cloned());
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Each call rendered as its space-joined tokens.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|tokens| tokens.join(" "))
            .collect()
    }
}

/// Builds a session that answers every command through `reply` and expects
/// exactly one close.
pub(crate) fn session_replying<F>(sent: &SentCommands, reply: F) -> MockEngineSession
where
    F: Fn(&str, &[String]) -> Result<Response, SessionError> + Send + 'static,
{
    session_counting_closes(sent, reply, &Arc::default())
}

/// Like [`session_replying`], also counting closes in `closes`.
///
/// The count stays observable when the session is dropped on a thread the
/// test never joins.
pub(crate) fn session_counting_closes<F>(
    sent: &SentCommands,
    reply: F,
    closes: &Arc<AtomicUsize>,
) -> MockEngineSession
where
    F: Fn(&str, &[String]) -> Result<Response, SessionError> + Send + 'static,
{
    let mut session = MockEngineSession::new();
    let recorder = sent.clone();
    session
        .expect_send()
        .returning(move |command, arguments| {
            recorder.record(command, arguments);
            reply(command, arguments)
        });
    let counter = Arc::clone(closes);
    session.expect_close().times(1).returning(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    session
}

/// Reply used by most tests: a few known commands and a rejection for the
/// rest.
pub(crate) fn engine_reply(command: &str, _arguments: &[String]) -> Result<Response, SessionError> {
    match command {
        "command-list" => Ok(Response::ok(serde_json::json!({
            "count": 2,
            "commands": ["uptime", "version"]
        }))),
        "uptime" => Ok(Response::ok(12345)),
        "version" => Ok(Response::ok("7.0.0 RELEASE")),
        "iface-stat" | "reopen-log" => Ok(Response::ok("done")),
        other => Err(SessionError::Rejected {
            command: other.to_owned(),
            message: String::from("Unknown command"),
        }),
    }
}
