//! Test support for driving the CLI runtime in-process.
//!
//! Supplies captured output streams, an injectable connector, and a manual
//! signal source so tests can exercise the whole flow without a terminal or
//! a running engine.

mod fake_engine;

use std::ffi::OsString;
use std::io::{self, BufRead, Cursor, Read, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use suricatasc_config::Config;
use suricatasc_socket::SessionError;

use super::MockEngineSession;
use crate::shutdown::{
    ListenerHandle, ShutdownError, ShutdownNotifier, ShutdownSignal, ShutdownTrigger,
};
use crate::{AppError, Connector, IoStreams, run_with};

pub(super) use fake_engine::FakeEngine;

/// Cloneable writer whose contents can be inspected after the run.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn text(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Signal source fired explicitly by the test.
#[derive(Clone, Default)]
pub(crate) struct ManualSignal {
    notifier: Arc<Mutex<Option<ShutdownNotifier>>>,
}

impl ManualSignal {
    pub(crate) fn fire(&self, signal: i32) {
        let slot = self.notifier.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(notifier) = slot.as_ref() {
            notifier.notify(ShutdownTrigger::Signal(signal));
        }
    }
}

impl ShutdownSignal for ManualSignal {
    fn listen(&self, notifier: ShutdownNotifier) -> Result<ListenerHandle, ShutdownError> {
        *self.notifier.lock().unwrap_or_else(PoisonError::into_inner) = Some(notifier);
        Ok(ListenerHandle::detached())
    }
}

/// Stdin stand-in whose reads block like an idle terminal.
///
/// Each read first announces itself on the `waiting` channel, then blocks
/// until the paired [`InputRelease`] is dropped and reports end of file.
pub(crate) struct BlockedInput {
    waiting: Sender<()>,
    release: Receiver<()>,
}

/// Keeps a [`BlockedInput`] blocked while alive.
pub(crate) struct InputRelease {
    _sender: Sender<()>,
}

impl BlockedInput {
    /// Returns the input, its release guard, and a receiver that yields once
    /// per read that starts blocking.
    pub(crate) fn new() -> (Self, InputRelease, Receiver<()>) {
        let (waiting, reads) = mpsc::channel();
        let (sender, release) = mpsc::channel();
        (
            Self { waiting, release },
            InputRelease { _sender: sender },
            reads,
        )
    }
}

impl Read for BlockedInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        let _announced = self.waiting.send(());
        let _released = self.release.recv();
        Ok(0)
    }
}

/// Hands out a prepared mock session and counts connection attempts.
#[derive(Default)]
pub(crate) struct StaticConnector {
    session: Mutex<Option<MockEngineSession>>,
    attempts: AtomicUsize,
}

impl StaticConnector {
    pub(crate) fn new(session: MockEngineSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            attempts: AtomicUsize::new(0),
        }
    }

    /// A connector whose every attempt fails.
    pub(crate) fn refusing() -> Self {
        Self::default()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for StaticConnector {
    type Session = MockEngineSession;

    fn connect(&self, config: &Config) -> Result<Self::Session, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| {
                AppError::Connect(SessionError::Connect {
                    path: config.socket().to_path_buf(),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                })
            })
    }
}

/// Exit status and captured streams of one run.
pub(crate) struct Outcome {
    pub(crate) exit: ExitCode,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Runs the CLI with `args` (without the binary name) and `input` on stdin.
pub(crate) fn run_cli<C: Connector>(
    args: &[&str],
    input: &str,
    connector: &C,
    signal: &ManualSignal,
) -> Outcome {
    run_cli_reading(args, Cursor::new(input.as_bytes().to_vec()), connector, signal)
}

/// Runs the CLI with an arbitrary stdin reader.
pub(crate) fn run_cli_reading<C, R>(
    args: &[&str],
    input: R,
    connector: &C,
    signal: &ManualSignal,
) -> Outcome
where
    C: Connector,
    R: BufRead + Send + 'static,
{
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();
    let io = IoStreams {
        input,
        stdout: stdout.clone(),
        stderr: stderr.clone(),
    };
    let argv = std::iter::once(OsString::from("suricatasc"))
        .chain(args.iter().map(OsString::from))
        .collect::<Vec<_>>();
    let exit = run_with(argv, io, connector, signal);
    Outcome {
        exit,
        stdout: stdout.text(),
        stderr: stderr.text(),
    }
}
