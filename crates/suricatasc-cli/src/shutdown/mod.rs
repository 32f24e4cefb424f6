//! Shutdown coordination between the signal listener and the session worker.
//!
//! The coordinator moves through three phases: `Running`, `ShuttingDown`
//! and `Closed`. Whichever task finishes first posts a [`ShutdownTrigger`]
//! on a single-slot channel; the main flow then marks the session as
//! shutting down, waits for any in-flight dispatch to release the session
//! lock, and closes the session exactly once.

use std::process::ExitCode;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};

use suricatasc_socket::Session;
use tracing::{debug, warn};

use crate::command::CommandInvocation;
use crate::dispatch::dispatch;
use crate::errors::AppError;

mod signal;

pub(crate) use signal::{ListenerHandle, ShutdownError, ShutdownSignal, SystemShutdownSignal};

const SHUTDOWN_TARGET: &str = "suricatasc::shutdown";

const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const CLOSED: u8 = 2;

/// Lifecycle phase of the shared session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownPhase {
    Running,
    ShuttingDown,
    Closed,
}

/// Atomically tracked [`ShutdownPhase`].
#[derive(Debug)]
pub(crate) struct ShutdownState(AtomicU8);

impl ShutdownState {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(RUNNING))
    }

    pub(crate) fn phase(&self) -> ShutdownPhase {
        match self.0.load(Ordering::Acquire) {
            RUNNING => ShutdownPhase::Running,
            SHUTTING_DOWN => ShutdownPhase::ShuttingDown,
            _ => ShutdownPhase::Closed,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.phase() == ShutdownPhase::Running
    }

    /// Leaves `Running`. Returns false if shutdown had already begun.
    fn begin(&self) -> bool {
        self.0
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn mark_closed(&self) {
        self.0.store(CLOSED, Ordering::Release);
    }
}

/// Why the main flow stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ShutdownTrigger {
    /// A termination signal arrived.
    Signal(i32),
    /// Standard input reached end of file or failed.
    InputClosed,
    /// The session worker finished with the given exit code.
    Finished(ExitCode),
}

impl ShutdownTrigger {
    pub(crate) const fn exit_code(self) -> ExitCode {
        match self {
            Self::Signal(_) | Self::InputClosed => ExitCode::SUCCESS,
            Self::Finished(code) => code,
        }
    }
}

/// Posts the first completion to the coordinator; later posts are dropped.
#[derive(Debug, Clone)]
pub(crate) struct ShutdownNotifier {
    sender: SyncSender<ShutdownTrigger>,
}

impl ShutdownNotifier {
    pub(crate) fn notify(&self, trigger: ShutdownTrigger) {
        if self.sender.try_send(trigger).is_err() {
            debug!(target: SHUTDOWN_TARGET, ?trigger, "completion already posted");
        }
    }
}

/// Creates the single-slot completion channel.
pub(crate) fn completion_channel() -> (ShutdownNotifier, Receiver<ShutdownTrigger>) {
    let (sender, receiver) = mpsc::sync_channel(1);
    (ShutdownNotifier { sender }, receiver)
}

/// Owns a session and closes it at most once.
struct SessionGuard<S: Session> {
    session: S,
    closed: bool,
}

impl<S: Session> SessionGuard<S> {
    const fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.session.close() {
            Ok(()) => debug!(target: SHUTDOWN_TARGET, "session closed"),
            Err(error) => warn!(target: SHUTDOWN_TARGET, %error, "failed to close session"),
        }
    }
}

impl<S: Session> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Session shared between the worker and the coordinator.
pub(crate) struct SessionContext<S: Session> {
    session: Arc<Mutex<SessionGuard<S>>>,
    state: Arc<ShutdownState>,
}

impl<S: Session> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Session> SessionContext<S> {
    pub(crate) fn new(session: S) -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionGuard::new(session))),
            state: Arc::new(ShutdownState::new()),
        }
    }

    pub(crate) fn phase(&self) -> ShutdownPhase {
        self.state.phase()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Dispatches `invocation` unless shutdown has begun.
    ///
    /// The phase is checked while holding the session lock, so no dispatch
    /// starts once the coordinator has begun closing. Returns `Ok(None)` when
    /// the dispatch was skipped.
    pub(crate) fn dispatch(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Option<String>, AppError> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.state.is_running() || guard.closed {
            debug!(
                target: SHUTDOWN_TARGET,
                command = invocation.command(),
                "dispatch skipped during shutdown"
            );
            return Ok(None);
        }
        dispatch(&mut guard.session, invocation).map(Some)
    }

    /// Moves to `ShuttingDown`, waits for the session lock, and closes it.
    ///
    /// Only the first call closes the session; later calls return once the
    /// state is `Closed`.
    pub(crate) fn shutdown(&self) {
        if !self.state.begin() {
            return;
        }
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        guard.close();
        self.state.mark_closed();
    }
}
