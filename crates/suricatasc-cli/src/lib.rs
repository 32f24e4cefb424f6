//! Command-line client for the Suricata management socket.
//!
//! The runtime parses arguments, connects once, and then runs two tasks: a
//! signal listener and a session worker that drives either a single command
//! or an interactive prompt. The first task to finish posts a completion;
//! the coordinator then closes the session exactly once and returns the
//! exit code. Connection and signal sources are injected so tests can run
//! the whole flow without a live engine.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use clap::error::ErrorKind;
use suricatasc_config::Config;
use suricatasc_socket::{Session, SocketSession};
use tracing::{debug, error, info};

mod cli;
mod command;
mod dispatch;
mod errors;
mod interaction;
mod shutdown;
mod telemetry;

use cli::{Cli, Mode};
use errors::AppError;
use interaction::Interaction;
use shutdown::{
    SessionContext, ShutdownNotifier, ShutdownSignal, ShutdownTrigger, SystemShutdownSignal,
    completion_channel,
};

const RUNTIME_TARGET: &str = "suricatasc::runtime";

/// How long the coordinator waits for the worker after closing the session.
///
/// A worker blocked on a terminal read is left behind once this expires.
const WORKER_GRACE: Duration = Duration::from_millis(250);

/// Bundles the streams handed to the session worker.
pub(crate) struct IoStreams<R, W, E> {
    pub(crate) input: R,
    pub(crate) stdout: W,
    pub(crate) stderr: E,
}

/// Opens sessions for the runtime.
pub(crate) trait Connector {
    type Session: Session + Send + 'static;

    fn connect(&self, config: &Config) -> Result<Self::Session, AppError>;
}

/// Connects to the configured unix socket after checking it exists.
pub(crate) struct SocketConnector;

impl Connector for SocketConnector {
    type Session = SocketSession;

    fn connect(&self, config: &Config) -> Result<Self::Session, AppError> {
        debug!(target: RUNTIME_TARGET, socket = %config.socket(), "connecting to engine");
        config.verify_socket()?;
        suricatasc_socket::connect(config.socket()).map_err(AppError::Connect)
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, input: R, stdout: W, stderr: E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let io = IoStreams {
        input,
        stdout,
        stderr,
    };
    run_with(args, io, &SocketConnector, &SystemShutdownSignal)
}

pub(crate) fn run_with<I, R, W, E, C, G>(
    args: I,
    mut io: IoStreams<R, W, E>,
    connector: &C,
    signal: &G,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
    E: Write + Send + 'static,
    C: Connector,
    G: ShutdownSignal,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(error, &mut io),
    };

    let (mode, session) = match prepare(&cli, connector) {
        Ok(prepared) => prepared,
        Err(error) => {
            let _ = writeln!(io.stderr, "{error}");
            return ExitCode::FAILURE;
        }
    };

    let context = SessionContext::new(session);
    let (notifier, completions) = completion_channel();
    let listener = match signal.listen(notifier.clone()) {
        Ok(listener) => listener,
        Err(error) => {
            let _ = writeln!(io.stderr, "{}", AppError::from(error));
            return ExitCode::FAILURE;
        }
    };

    let worker_context = context.clone();
    let spawned = thread::Builder::new()
        .name(String::from("suricatasc-session"))
        .spawn(move || run_worker(mode, &worker_context, io, &notifier));
    let worker = match spawned {
        Ok(worker) => worker,
        Err(source) => {
            error!(target: RUNTIME_TARGET, %source, "failed to start session worker");
            context.shutdown();
            listener.stop();
            return ExitCode::FAILURE;
        }
    };

    let trigger = completions
        .recv()
        .unwrap_or(ShutdownTrigger::Finished(ExitCode::FAILURE));
    info!(target: RUNTIME_TARGET, ?trigger, "shutting down");
    context.shutdown();
    listener.stop();
    debug!(target: RUNTIME_TARGET, phase = ?context.phase(), "session released");

    let deadline = Instant::now() + WORKER_GRACE;
    while !worker.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    if worker.is_finished() {
        let _ = worker.join();
    } else {
        debug!(target: RUNTIME_TARGET, "session worker left blocked on input");
    }

    trigger.exit_code()
}

fn prepare<C: Connector>(cli: &Cli, connector: &C) -> Result<(Mode, C::Session), AppError> {
    let mode = cli.mode()?;
    telemetry::initialise(&cli.config)?;
    let session = connector.connect(&cli.config)?;
    info!(
        target: RUNTIME_TARGET,
        socket = %cli.config.socket(),
        interactive = matches!(mode, Mode::Interactive),
        "session opened"
    );
    Ok((mode, session))
}

fn report_usage<R, W: Write, E: Write>(error: clap::Error, io: &mut IoStreams<R, W, E>) -> ExitCode {
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        let _ = write!(io.stdout, "{error}");
        return ExitCode::SUCCESS;
    }
    let _ = write!(io.stderr, "{}", AppError::CliUsage(error));
    ExitCode::FAILURE
}

fn run_worker<S, R, W, E>(
    mode: Mode,
    context: &SessionContext<S>,
    io: IoStreams<R, W, E>,
    notifier: &ShutdownNotifier,
) where
    S: Session,
    R: BufRead,
    W: Write,
    E: Write,
{
    let IoStreams {
        mut input,
        mut stdout,
        mut stderr,
    } = io;
    let mut interaction = Interaction::new(context, &mut stdout, &mut stderr);
    let trigger = match mode {
        Mode::OneShot(invocation) => interaction.one_shot(&invocation),
        Mode::Interactive => interaction.interactive(&mut input),
    };
    notifier.notify(trigger);
}

#[cfg(test)]
mod tests;
