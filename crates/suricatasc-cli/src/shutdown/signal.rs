//! Termination signal listeners.

use std::io;
use std::thread::{self, JoinHandle};

use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::info;

use super::{SHUTDOWN_TARGET, ShutdownNotifier, ShutdownTrigger};

/// Abstraction over shutdown notification mechanisms.
pub(crate) trait ShutdownSignal {
    /// Starts listening and posts a [`ShutdownTrigger::Signal`] on arrival.
    fn listen(&self, notifier: ShutdownNotifier) -> Result<ListenerHandle, ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub(crate) enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        #[source]
        source: io::Error,
    },
    /// The listener thread could not be started.
    #[error("failed to start signal listener: {source}")]
    Spawn {
        #[source]
        source: io::Error,
    },
}

/// Stops a running listener when dropped.
#[derive(Default)]
pub(crate) struct ListenerHandle {
    signals: Option<Handle>,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// A handle with nothing to stop, for listeners without a thread.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self::default()
    }

    /// Closes the signal iterator and joins the listener thread.
    pub(crate) fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        if let Some(signals) = self.signals.take() {
            signals.close();
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.stop_inner();
    }
}

/// Listens for SIGINT, SIGTERM and SIGQUIT on a dedicated thread.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn listen(&self, notifier: ShutdownNotifier) -> Result<ListenerHandle, ShutdownError> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT])
            .map_err(|source| ShutdownError::Install { source })?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name(String::from("suricatasc-signals"))
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    info!(target: SHUTDOWN_TARGET, signal, "shutdown signal received");
                    notifier.notify(ShutdownTrigger::Signal(signal));
                }
            })
            .map_err(|source| ShutdownError::Spawn { source })?;
        Ok(ListenerHandle {
            signals: Some(handle),
            thread: Some(thread),
        })
    }
}
